//! Input validation limits for splash options

/// Maximum splash depth (1,000,000)
pub const MAX_SPLASH_DEPTH: u32 = 1_000_000;

/// Maximum origins in a single splash (100,000)
pub const MAX_SPLASH_ORIGINS: usize = 100_000;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    SplashDepthTooLarge { depth: u32, max: u32 },
    TooManyOrigins { count: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SplashDepthTooLarge { depth, max } => {
                write!(f, "Splash depth too large: {} (max {})", depth, max)
            }
            Self::TooManyOrigins { count, max } => {
                write!(f, "Too many splash origins: {} (max {})", count, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate splash depth ceiling
pub fn validate_splash_depth(depth: u32) -> Result<(), ValidationError> {
    if depth > MAX_SPLASH_DEPTH {
        return Err(ValidationError::SplashDepthTooLarge {
            depth,
            max: MAX_SPLASH_DEPTH,
        });
    }
    Ok(())
}

/// Validate splash origin count
pub fn validate_splash_origins(count: usize) -> Result<(), ValidationError> {
    if count > MAX_SPLASH_ORIGINS {
        return Err(ValidationError::TooManyOrigins {
            count,
            max: MAX_SPLASH_ORIGINS,
        });
    }
    Ok(())
}
