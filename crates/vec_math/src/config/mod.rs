//! Configuration system
//!
//! Camera descriptions live in TOML or RON files and build the view and
//! projection matrices they describe.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::math::{Mat3x4, Mat4x4, Vec3, PRECISION};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Check values that parse but cannot be used
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Load configuration from a `.toml` or `.ron` file and validate it
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, parse errors, unknown extensions and values
    /// rejected by [`Config::validate`].
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let contents = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Toml => {
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
        };
        config.validate()?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a `.toml` or `.ron` file
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, serialization errors and unknown extensions.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        log::debug!("Saved configuration to {}", path.display());
        Ok(())
    }
}

/// File formats picked by extension
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Parsed value that cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which way the view space Z axis points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    /// Camera looks down -Z (OpenGL)
    #[default]
    Right,
    /// Camera looks down +Z (Direct3D)
    Left,
}

/// Camera placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Camera position
    pub eye: Vec3,
    /// Point the camera looks at
    pub center: Vec3,
    /// Approximate up direction
    pub up: Vec3,
    /// View space convention
    #[serde(default)]
    pub handedness: Handedness,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            center: Vec3::zero(),
            up: Vec3::new(0.0, 1.0, 0.0),
            handedness: Handedness::Right,
        }
    }
}

impl ViewConfig {
    /// World to view transform
    pub fn view_matrix(&self) -> Mat4x4 {
        let mut view = Mat4x4::identity();
        match self.handedness {
            Handedness::Right => view.look_at_rh(&self.eye, &self.center, &self.up),
            Handedness::Left => view.look_at_lh(&self.eye, &self.center, &self.up),
        };
        view
    }

    /// World to view transform as an affine matrix (right-handed)
    pub fn affine_view(&self) -> Mat3x4 {
        let mut view = Mat3x4::identity();
        view.look_at(&self.eye, &self.center, &self.up);
        view
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut forward = self.center;
        forward.sub(&self.eye);
        if forward.squared_length() < PRECISION {
            return Err(ConfigError::Invalid(format!(
                "eye {} and center {} coincide",
                self.eye, self.center
            )));
        }

        let mut side = Vec3::zero();
        side.assign_cross(&forward, &self.up);
        if side.squared_length() < PRECISION * forward.squared_length() * self.up.squared_length() {
            return Err(ConfigError::Invalid(format!(
                "up {} is parallel to the view direction",
                self.up
            )));
        }
        Ok(())
    }
}

/// Projection description; angles in degrees, distances positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionConfig {
    /// Symmetric perspective from a vertical field of view
    Perspective {
        /// Full vertical field of view in degrees
        fov_y_degrees: f64,
        /// Width over height
        aspect: f64,
        /// Near plane distance
        near: f64,
        /// Far plane distance
        far: f64,
    },
    /// Parallel projection of a box
    Orthographic {
        /// Left plane
        left: f64,
        /// Right plane
        right: f64,
        /// Bottom plane
        bottom: f64,
        /// Top plane
        top: f64,
        /// Near plane distance
        near: f64,
        /// Far plane distance
        far: f64,
    },
    /// Perspective of an off-center frustum, extents on the near plane
    Frustum {
        /// Left edge
        left: f64,
        /// Right edge
        right: f64,
        /// Bottom edge
        bottom: f64,
        /// Top edge
        top: f64,
        /// Near plane distance
        near: f64,
        /// Far plane distance
        far: f64,
    },
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self::Perspective {
            fov_y_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl ProjectionConfig {
    /// View to clip transform
    pub fn matrix(&self) -> Mat4x4 {
        let mut projection = Mat4x4::identity();
        match *self {
            Self::Perspective { fov_y_degrees, aspect, near, far } => {
                projection.perspective(fov_y_degrees, aspect, near, far);
            }
            Self::Orthographic { left, right, bottom, top, near, far } => {
                projection.orthogonal(left, right, bottom, top, near, far);
            }
            Self::Frustum { left, right, bottom, top, near, far } => {
                projection.frustum(left, right, bottom, top, near, far);
            }
        }
        projection
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| Err(ConfigError::Invalid(message.to_owned()));

        let (near, far) = match *self {
            Self::Perspective { fov_y_degrees, aspect, near, far } => {
                if !(fov_y_degrees > 0.0 && fov_y_degrees < 180.0) {
                    return invalid("fov_y_degrees must be between 0 and 180");
                }
                if aspect <= 0.0 {
                    return invalid("aspect must be positive");
                }
                if near <= 0.0 {
                    return invalid("perspective near plane must be positive");
                }
                (near, far)
            }
            Self::Frustum { left, right, bottom, top, near, far } => {
                if near <= 0.0 {
                    return invalid("frustum near plane must be positive");
                }
                if right <= left || top <= bottom {
                    return invalid("frustum extents are empty");
                }
                (near, far)
            }
            Self::Orthographic { left, right, bottom, top, near, far } => {
                if right <= left || top <= bottom {
                    return invalid("orthographic extents are empty");
                }
                (near, far)
            }
        };

        if far <= near {
            return invalid("far plane must lie beyond the near plane");
        }
        Ok(())
    }
}

/// Camera described by a view and a projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Camera placement
    #[serde(default)]
    pub view: ViewConfig,
    /// Lens
    #[serde(default)]
    pub projection: ProjectionConfig,
}

impl CameraConfig {
    /// World to view transform
    pub fn view_matrix(&self) -> Mat4x4 {
        self.view.view_matrix()
    }

    /// World to view transform as an affine matrix
    pub fn affine_view(&self) -> Mat3x4 {
        self.view.affine_view()
    }

    /// View to clip transform
    pub fn projection_matrix(&self) -> Mat4x4 {
        self.projection.matrix()
    }

    /// World to clip transform: `projection · view`
    pub fn view_projection(&self) -> Mat4x4 {
        let mut combined = self.projection.matrix();
        combined.mul(&self.view_matrix());
        combined
    }
}

impl Config for CameraConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.view.validate()?;
        self.projection.validate()
    }
}
