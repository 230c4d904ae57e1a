//! End-to-end tests of the homology pipeline
//!
//! Tests cover:
//! - Diagrams of synthetic limit cycles
//! - Batch comparison of trials
//! - Recordings loaded from disk
//! - Configuration files driving the pipeline

use std::f64::consts::PI;
use std::io::Write;

use phase_space_tda::geometry::phase::{normalized_cloud, range};
use phase_space_tda::recording::pooled_ranges;
use phase_space_tda::topology::seeded_rng;
use phase_space_tda::{
    analyze_trials, persistent_homology, FitzHughNagumo, JointRecording, PipelineConfig, Point,
    PointCloud, ScaleSweep, TdaError,
};

/// Spiking FitzHugh-Nagumo trajectory mapped into [-1, 1]²
fn limit_cycle(seed: u64) -> PointCloud {
    let mut fhn = FitzHughNagumo::new(0.5);
    fhn.run(2000);
    let raw = fhn
        .noisy_trajectory(300, 4, 0.01, &mut seeded_rng(seed))
        .unwrap();

    let (x, y): (Vec<f64>, Vec<f64>) = raw.iter().map(|p| (p.x, p.y)).unzip();
    normalized_cloud(&x, &y, range(&x).unwrap(), range(&y).unwrap()).unwrap()
}

fn circle(n: usize, radius: f64) -> PointCloud {
    let points = (0..n)
        .map(|i| {
            let t = 2.0 * PI * i as f64 / n as f64;
            Point::new(radius * t.cos(), radius * t.sin())
        })
        .collect();
    PointCloud::new(points).unwrap()
}

mod limit_cycles {
    use super::*;

    #[test]
    fn test_spiking_trajectory_has_a_loop() {
        let pd = persistent_homology(&limit_cycle(1), &PipelineConfig::default()).unwrap();

        assert!(!pd.is_empty());
        assert!(
            pd.max_persistence() > 0.3,
            "expected a long-lived loop, got {}",
            pd.max_persistence()
        );
    }

    #[test]
    fn test_intervals_lie_in_the_sweep() {
        let config = PipelineConfig::default();
        let pd = persistent_homology(&limit_cycle(2), &config).unwrap();

        for interval in pd.iter() {
            assert!(interval.birth >= config.scale.start);
            assert!(interval.death <= config.scale.stop + config.scale.step);
            assert!(interval.death > interval.birth);
        }
    }

    #[test]
    fn test_landmark_seed_is_honoured() {
        let cloud = limit_cycle(3);
        let config = PipelineConfig {
            landmark_seed: 11,
            ..PipelineConfig::default()
        };
        let a = persistent_homology(&cloud, &config).unwrap();
        let b = persistent_homology(&cloud, &config).unwrap();
        assert_eq!(a, b);
    }
}

mod batch {
    use super::*;

    #[test]
    fn test_same_dynamics_are_closer() {
        let trials = vec![
            ("fhn_a".to_string(), limit_cycle(1)),
            ("fhn_b".to_string(), limit_cycle(2)),
            ("small_circle".to_string(), circle(100, 0.3)),
        ];
        let config = PipelineConfig {
            top_k_intervals: 1,
            ..PipelineConfig::default()
        };
        let report = analyze_trials(&trials, &config).unwrap();

        let same = report.distance_between("fhn_a", "fhn_b").unwrap();
        let cross_a = report.distance_between("fhn_a", "small_circle").unwrap();
        let cross_b = report.distance_between("fhn_b", "small_circle").unwrap();
        assert!(same < cross_a, "same {same}, cross {cross_a}");
        assert!(same < cross_b, "same {same}, cross {cross_b}");

        // The most distant pair normalizes to exactly 1
        assert_eq!(report.normalized.max(), 1.0);
        assert_eq!(report.adjacency[[0, 1]], report.adjacency[[1, 0]]);
    }

    #[test]
    fn test_short_diagram_aborts_batch() {
        let trials = vec![
            ("circle".to_string(), circle(80, 1.0)),
            ("other".to_string(), circle(90, 1.0)),
        ];
        let config = PipelineConfig {
            landmark_count: 8,
            top_k_intervals: 50,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            analyze_trials(&trials, &config),
            Err(TdaError::InsufficientIntervals { required: 50, .. })
        ));
    }

    #[test]
    fn test_degenerate_trial_aborts_batch() {
        let collapsed = PointCloud::new(vec![Point::new(0.5, 0.5); 20]).unwrap();
        let trials = vec![
            ("circle".to_string(), circle(80, 1.0)),
            ("collapsed".to_string(), collapsed),
        ];
        assert!(matches!(
            analyze_trials(&trials, &PipelineConfig::default()),
            Err(TdaError::DegenerateInput(_))
        ));
    }
}

mod recordings {
    use super::*;

    fn write_recording(phase_shift: f64) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# hip_angle hip_velocity knee_angle knee_velocity").unwrap();
        for i in 0..120 {
            let t = 2.0 * PI * i as f64 / 60.0;
            writeln!(
                file,
                "{:.6} {:.6} {:.6} {:.6}",
                20.0 * t.sin(),
                20.0 * t.cos(),
                45.0 * (2.0 * t + phase_shift).sin(),
                90.0 * (2.0 * t + phase_shift).cos()
            )
            .unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_recordings_share_normalization() {
        let files = [write_recording(0.0), write_recording(0.7)];
        let phases: Vec<_> = files
            .iter()
            .map(|f| JointRecording::from_path(f.path()).unwrap().relative_phase().unwrap())
            .collect();

        let (crp_range, crp_dot_range) = pooled_ranges(&phases).unwrap();
        for phase in &phases {
            let cloud = phase.to_cloud(crp_range, crp_dot_range).unwrap();
            assert_eq!(cloud.len(), 120);
            assert!(cloud
                .iter()
                .all(|p| (-1.0..=1.0).contains(&p.x) && (-1.0..=1.0).contains(&p.y)));
        }
    }

    #[test]
    fn test_malformed_recording() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1.0 2.0 3.0 4.0").unwrap();
        writeln!(file, "1.0 2.0 three 4.0").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            JointRecording::from_path(file.path()),
            Err(TdaError::Parse { line: 2, .. })
        ));
    }
}

mod configuration {
    use super::*;

    #[test]
    fn test_config_file_drives_pipeline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "landmark_count = 8\ntop_k_intervals = 1\n\n[scale]\nstart = 0.0\nstop = 3.0\nstep = 0.05"
        )
        .unwrap();
        file.flush().unwrap();

        let config = PipelineConfig::from_path(file.path()).unwrap();
        assert_eq!(config.landmark_count, 8);
        assert_eq!(config.scale, ScaleSweep::new(0.0, 3.0, 0.05).unwrap());
        assert_eq!(config.adjacency_threshold, 0.5);

        let pd = persistent_homology(&circle(64, 1.0), &config).unwrap();
        assert!(pd.max_persistence() > 0.5);
    }

    #[test]
    fn test_invalid_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "landmark_count = 0").unwrap();
        file.flush().unwrap();
        assert!(matches!(
            PipelineConfig::from_path(file.path()),
            Err(TdaError::InvalidParameter(_))
        ));
    }
}
