use std::path::Path;

use crate::models::BuildSystem;

/// Auto-detect build systems by scanning for known manifest files.
pub fn detect_build_systems(path: &Path) -> Vec<BuildSystem> {
    let mut systems = Vec::new();

    if path.join("pom.xml").exists() {
        systems.push(BuildSystem::Maven);
    }

    if path.join("build.gradle").exists()
        || path.join("build.gradle.kts").exists()
        || path.join("settings.gradle").exists()
        || path.join("settings.gradle.kts").exists()
        || path.join("gradle.lockfile").exists()
    {
        systems.push(BuildSystem::Gradle);
    }

    systems
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_build_systems() {
        let dir = TempDir::new().unwrap();
        assert!(detect_build_systems(dir.path()).is_empty());

        std::fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        assert_eq!(detect_build_systems(dir.path()), vec![BuildSystem::Maven]);

        std::fs::write(dir.path().join("settings.gradle.kts"), "").unwrap();
        assert_eq!(
            detect_build_systems(dir.path()),
            vec![BuildSystem::Maven, BuildSystem::Gradle]
        );
    }
}
