// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::env;
use std::path::{Path, PathBuf};

/// Overrides the platform device directory holding `camerasensorN/info`.
pub const ENV_PLATFORM_DIR: &str = "NX_V4L2_PLATFORM_DIR";
/// Overrides the video4linux class directory.
pub const ENV_CLASS_DIR: &str = "NX_V4L2_CLASS_DIR";
/// Overrides the directory device nodes are created in.
pub const ENV_DEV_DIR: &str = "NX_V4L2_DEV_DIR";
/// Overrides the media-controller device node.
pub const ENV_MEDIA_DEVICE: &str = "NX_V4L2_MEDIA_DEVICE";

/// Filesystem locations probed during discovery
///
/// The defaults point at the live system. Each location can be replaced
/// with the `with_*` methods or through the `NX_V4L2_*` environment
/// variables, which is how tests run discovery against fixture trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// platform device directory, holds `camerasensorN/info`
    platform_dir: PathBuf,

    /// video4linux class directory, one entry per registered node
    class_dir: PathBuf,

    /// directory the video4linux device nodes live in
    dev_dir: PathBuf,

    /// media-controller device node
    media_device: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            platform_dir: PathBuf::from("/sys/devices/platform"),
            class_dir: PathBuf::from("/sys/class/video4linux"),
            dev_dir: PathBuf::from("/dev"),
            media_device: PathBuf::from("/dev/media0"),
        }
    }
}

impl Config {
    /// Defaults, with any `NX_V4L2_*` environment overrides applied.
    pub fn from_env() -> Config {
        let mut config = Config::default();
        if let Some(dir) = env::var_os(ENV_PLATFORM_DIR) {
            config.platform_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env::var_os(ENV_CLASS_DIR) {
            config.class_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env::var_os(ENV_DEV_DIR) {
            config.dev_dir = PathBuf::from(dir);
        }
        if let Some(path) = env::var_os(ENV_MEDIA_DEVICE) {
            config.media_device = PathBuf::from(path);
        }
        log::debug!("discovery config: {:?}", config);
        config
    }

    pub fn with_platform_dir(self, dir: impl Into<PathBuf>) -> Config {
        Config {
            platform_dir: dir.into(),
            ..self
        }
    }

    pub fn with_class_dir(self, dir: impl Into<PathBuf>) -> Config {
        Config {
            class_dir: dir.into(),
            ..self
        }
    }

    pub fn with_dev_dir(self, dir: impl Into<PathBuf>) -> Config {
        Config {
            dev_dir: dir.into(),
            ..self
        }
    }

    pub fn with_media_device(self, path: impl Into<PathBuf>) -> Config {
        Config {
            media_device: path.into(),
            ..self
        }
    }

    pub fn platform_dir(&self) -> &Path {
        &self.platform_dir
    }

    pub fn class_dir(&self) -> &Path {
        &self.class_dir
    }

    pub fn dev_dir(&self) -> &Path {
        &self.dev_dir
    }

    pub fn media_device(&self) -> &Path {
        &self.media_device
    }

    /// `<platform_dir>/camerasensor<instance>/info`
    pub fn sensor_info_path(&self, instance: usize) -> PathBuf {
        self.platform_dir
            .join(format!("camerasensor{}", instance))
            .join("info")
    }

    /// `<dev_dir>/<node>`
    pub fn device_node(&self, node: &str) -> PathBuf {
        self.dev_dir.join(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert_eq!(
            config.sensor_info_path(0),
            PathBuf::from("/sys/devices/platform/camerasensor0/info")
        );
        assert_eq!(config.device_node("video3"), PathBuf::from("/dev/video3"));
        assert_eq!(config.media_device(), Path::new("/dev/media0"));
        assert_eq!(config.class_dir(), Path::new("/sys/class/video4linux"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::default()
            .with_platform_dir("/tmp/platform")
            .with_dev_dir("/tmp/dev");
        assert_eq!(
            config.sensor_info_path(2),
            PathBuf::from("/tmp/platform/camerasensor2/info")
        );
        assert_eq!(config.device_node("video0"), PathBuf::from("/tmp/dev/video0"));
        assert_eq!(config.class_dir(), Path::new("/sys/class/video4linux"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var(ENV_CLASS_DIR, "/tmp/class");
        env::set_var(ENV_MEDIA_DEVICE, "/tmp/media9");
        let config = Config::from_env();
        env::remove_var(ENV_CLASS_DIR);
        env::remove_var(ENV_MEDIA_DEVICE);

        assert_eq!(config.class_dir(), Path::new("/tmp/class"));
        assert_eq!(config.media_device(), Path::new("/tmp/media9"));
        assert_eq!(config.dev_dir(), Path::new("/dev"));
    }
}
