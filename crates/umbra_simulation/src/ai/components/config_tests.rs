//! Tests for DetectorConfig and PatrolRoute.

#[cfg(test)]
mod tests {
    use super::super::{DetectorConfig, PatrolRoute, Waypoint, WaypointKind};
    use crate::error::SetupError;
    use crate::stealth::MovementNoise;
    use bevy::prelude::Vec3;

    #[test]
    fn test_detector_config_default() {
        let config = DetectorConfig::default();
        assert_eq!(config.detection_threshold, 100.0);
        assert_eq!(config.max_detection_value, 150.0);
        assert_eq!(config.base_detection_per_second, 25.0);
        assert_eq!(config.decay_per_second, 30.0);
        assert_eq!(config.lose_sight_timeout, 6.0);
        assert_eq!(config.hearing_threshold, MovementNoise::Walk);
        assert_eq!(config.noise_multipliers.get(MovementNoise::Crouch), 0.4);
        assert_eq!(config.darkness_multipliers.get(1), 0.5);
        assert_eq!(config.darkness_multipliers.get(2), 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inconsistent_values() {
        let mut config = DetectorConfig::default();
        config.detection_threshold = 200.0;
        assert!(matches!(config.validate(), Err(SetupError::InvalidConfig(_))));

        let mut config = DetectorConfig::default();
        config.patrol_dash_interval_min = 20.0;
        assert!(matches!(config.validate(), Err(SetupError::InvalidConfig(_))));

        let mut config = DetectorConfig::default();
        config.decay_per_second = -1.0;
        assert!(matches!(config.validate(), Err(SetupError::InvalidConfig(_))));

        let mut config = DetectorConfig::default();
        config.chase_dash_duration = 0.0;
        assert!(config.validate().is_err());

        let mut config = DetectorConfig::default();
        config.vision_fov = 400.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        let mut config = DetectorConfig::default();
        config.max_detection_value = f32::NAN;
        assert!(matches!(config.validate(), Err(SetupError::InvalidConfig(_))));

        let mut config = DetectorConfig::default();
        config.max_detection_value = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = DetectorConfig::default();
        config.decay_per_second = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = DetectorConfig::default();
        config.noise_multipliers.run = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = DetectorConfig::default();
        config.darkness_multipliers.dim = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_overrides_only_given_fields() {
        let config = DetectorConfig::from_json(
            r#"{ "detection_threshold": 80.0, "hearing_threshold": "Run", "noise_multipliers": { "run": 2.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.detection_threshold, 80.0);
        assert_eq!(config.hearing_threshold, MovementNoise::Run);
        assert_eq!(config.noise_multipliers.run, 2.0);
        assert_eq!(config.noise_multipliers.walk, 1.0);
        assert_eq!(config.vision_range, 8.0);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            DetectorConfig::from_json("{ not json"),
            Err(SetupError::ConfigParse(_))
        ));
        assert!(matches!(
            DetectorConfig::from_json(r#"{ "max_detection_value": 10.0 }"#),
            Err(SetupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_patrol_route_from_json() {
        let route: PatrolRoute = serde_json::from_str(
            r#"{ "waypoints": [
                { "position": [0.0, 0.0, 0.0] },
                { "position": [4.0, 0.0, 0.0], "kind": { "Wait": { "seconds": 2.5 } } }
            ] }"#,
        )
        .unwrap();

        assert_eq!(route.len(), 2);
        assert_eq!(route.get(0), Some(&Waypoint::at(Vec3::ZERO)));
        assert_eq!(
            route.get(1).map(|w| w.kind),
            Some(WaypointKind::Wait { seconds: 2.5 })
        );
        assert_eq!(route.next_index(1), 0);
        assert_eq!(PatrolRoute::default().next_index(3), 0);
    }
}
