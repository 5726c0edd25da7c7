//! Comprehensive unit tests for nd_normalize modules
//!
//! These tests cover the public surface of the supporting modules: errors,
//! configuration, parallel settings, statistics and the family registry.

use ndarray::{array, Array3, ArrayD};
use nd_normalize::{
    config::NormalizationConfig,
    errors::{NormError, Result},
    normalization::{Normalization, Normalizer},
    parallel::{get_parallel_info, ParallelConfig},
    statistics::{
        parallel_max_dims, parallel_mean_dims, parallel_median_dims, parallel_min_dims,
        parallel_robust_scale_dims, parallel_std_dims, Statistic,
    },
};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_error_types() {
    let unknown = NormError::UnknownNormalization {
        name: "Softmax".to_string(),
    };
    assert_eq!(format!("{unknown}"), "unknown normalization 'Softmax'");

    let unfit = NormError::UnfitNormalization {
        family: "ZScore".to_string(),
    };
    assert!(format!("{unfit}").contains("ZScore normalization has not been fit"));

    let axis = NormError::AxisOutOfRange { axis: 3, ndim: 2 };
    assert!(format!("{axis}").contains("axis 3 is out of range"));

    let shape = NormError::ShapeMismatch {
        axis: 1,
        expected: 3,
        found: 2,
    };
    assert!(format!("{shape}").contains("shape mismatch on axis 1"));

    let params = NormError::InconsistentParameterDimensions {
        index: 1,
        expected: vec![1, 3],
        found: vec![2, 1],
    };
    assert!(format!("{params}").contains("inconsistent parameter dimensions"));
}

#[test]
fn test_parallel_config() -> Result<()> {
    let data = Array3::from_shape_fn((8, 6, 5), |(i, j, k)| ((i * 11 + j * 7 + k) % 9) as f64)
        .into_dyn();
    let mut reference = Normalizer::new(Normalization::ZScore).with_dims(vec![0])?;
    let expected = reference.normalize(&data)?;

    // the pool is sized for the duration of the normalize call
    let config = ParallelConfig::with_threads(3);
    let mut normalizer = Normalizer::new(Normalization::ZScore).with_dims(vec![0])?;
    let (threads, out) =
        config.install(|| (rayon::current_num_threads(), normalizer.normalize(&data)))?;
    assert_eq!(threads, 3);
    assert_eq!(out?, expected);

    // without a thread count the closure runs on the caller's pool
    let outer = rayon::current_num_threads();
    let inline = ParallelConfig::default().install(|| config.current_threads())?;
    assert_eq!(inline, outer);

    assert_eq!(ParallelConfig::all_cores().num_threads, Some(num_cpus::get()));
    assert_eq!(
        NormalizationConfig::from_json_str(r#"{ "method": "Center", "threads": 5 }"#)?.parallel(),
        ParallelConfig::with_threads(5)
    );
    Ok(())
}

#[test]
fn test_global_pool_is_built_once() -> Result<()> {
    // no thread count leaves the global pool alone
    NormalizationConfig::new(Normalization::Center).apply_global_pool()?;

    // the first sized call may lose to rayon's lazy default pool; the second never wins
    let mut config = NormalizationConfig::new(Normalization::Center);
    config.threads = Some(2);
    let _ = config.apply_global_pool();
    match config.apply_global_pool() {
        Err(NormError::ThreadPoolError(message)) => assert!(message.contains("2 threads")),
        other => panic!("Expected ThreadPoolError, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_parallel_info() -> Result<()> {
    let info = ParallelConfig::with_threads(2).install(get_parallel_info)?;
    assert_eq!(info.current_threads, 2);
    assert_eq!(info.available_cores, num_cpus::get());
    assert!(info.available_parallelism > 0);

    // logging without a subscriber is a no-op
    info.log_info();
    Ok(())
}

#[test]
fn test_statistic() {
    assert_eq!(Statistic::Mean, Statistic::Mean);
    assert_ne!(Statistic::Mean, Statistic::Median);
    assert_eq!(format!("{:?}", Statistic::RobustScale), "RobustScale");
    assert_eq!(Statistic::Min.to_string(), "minimum");
}

#[test]
fn test_statistics_comprehensive() -> Result<()> {
    // time=4, lat=3, lon=2 with values 1..=24
    let data: ArrayD<f64> =
        Array3::from_shape_vec((4, 3, 2), (1..=24).map(f64::from).collect())?.into_dyn();

    // Mean over time
    let mean_time = parallel_mean_dims(&data, &[0])?;
    assert_eq!(mean_time.shape(), &[1, 3, 2]);
    // lat=0, lon=0: (1+7+13+19)/4 = 10.0
    // lat=0, lon=1: (2+8+14+20)/4 = 11.0
    assert_eq!(mean_time[[0, 0, 0]], 10.0);
    assert_eq!(mean_time[[0, 0, 1]], 11.0);

    // Mean over lat
    let mean_lat = parallel_mean_dims(&data, &[1])?;
    assert_eq!(mean_lat.shape(), &[4, 1, 2]);
    // time=0 lon=0: (1+3+5)/3 = 3.0
    assert_eq!(mean_lat[[0, 0, 0]], 3.0);
    assert_eq!(mean_lat[[0, 0, 1]], 4.0);

    // Min and max over time and lon together
    let min = parallel_min_dims(&data, &[0, 2])?;
    let max = parallel_max_dims(&data, &[0, 2])?;
    assert_eq!(min.shape(), &[1, 3, 1]);
    assert_eq!(min.iter().copied().collect::<Vec<_>>(), vec![1.0, 3.0, 5.0]);
    assert_eq!(max.iter().copied().collect::<Vec<_>>(), vec![20.0, 22.0, 24.0]);

    // Median and spread over lon
    let median = parallel_median_dims(&data, &[2])?;
    assert_eq!(median[[0, 0, 0]], 1.5);
    let std = parallel_std_dims(&data, &[2])?;
    assert!((std[[3, 2, 0]] - 0.5_f64.sqrt()).abs() < 1e-12);
    let robust = parallel_robust_scale_dims(&data, &[2])?;
    assert!((robust[[1, 1, 0]] - 0.5 / 1.35).abs() < 1e-12);

    // Invalid axis
    let result = parallel_mean_dims(&data, &[3]);
    match result {
        Err(NormError::AxisOutOfRange { axis, ndim }) => {
            assert_eq!(axis, 3);
            assert_eq!(ndim, 3);
        }
        _ => panic!("Expected AxisOutOfRange error"),
    }

    // Duplicate axis
    assert!(matches!(
        parallel_mean_dims(&data, &[1, 1]),
        Err(NormError::DuplicateAxis { axis: 1 })
    ));

    Ok(())
}

#[test]
fn test_registry_lookup() {
    for name in [
        "ZScore",
        "Sigmoid",
        "MinMax",
        "Center",
        "RobustCenter",
        "RobustZScore",
        "RobustSigmoid",
        "MixedZScore",
        "MixedSigmoid",
    ] {
        let family = Normalization::lookup(name).expect("registered family");
        assert_eq!(family.name(), name);
    }

    match Normalization::lookup("ZScores") {
        Err(NormError::UnknownNormalization { name }) => assert_eq!(name, "ZScores"),
        _ => panic!("Expected UnknownNormalization error"),
    }
}

#[test]
fn test_config_from_file() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("normalization.json");
    {
        let mut file = std::fs::File::create(&config_path)?;
        writeln!(
            file,
            r#"{{ "method": "MixedZScore", "dims": [0], "nan_safe": true, "threads": 2 }}"#
        )?;
    }

    let config = NormalizationConfig::from_json_file(&config_path)?;
    assert_eq!(config.method, Normalization::MixedZScore);

    let mut normalizer: Normalizer<f64> = config.build()?;
    let data = array![[1.0, f64::NAN], [3.0, 4.0], [5.0, 8.0]].into_dyn();
    let out = config.parallel().install(|| normalizer.normalize(&data))??;
    assert_eq!(out.shape(), &[3, 2]);
    assert!(out[[0, 1]].is_nan());
    assert!(normalizer.params().unwrap()[0].iter().all(|v| v.is_finite()));

    // Missing file
    let missing = NormalizationConfig::from_json_file(temp_dir.path().join("missing.json"));
    assert!(matches!(missing, Err(NormError::IoError(_))));

    Ok(())
}
