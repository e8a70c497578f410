use super::ConfigError;

/// Constructor validation lifecycle shared by kernel structs.
///
/// Kernels only hold configuration that has passed validation, so their
/// `run*` entry points never re-check it.
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}
