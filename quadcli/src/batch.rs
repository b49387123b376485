use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quadscribe::scriber::compose_side_by_side;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::cli::BatchArgs;
use crate::commands::{cloud_panel, primitive_panel, save, RunError};

#[derive(Debug, Default, PartialEq)]
pub struct BatchReport {
    pub rendered: Vec<String>,
    pub failed: Vec<String>,
}

/// Ids of every `.json` abstraction in `dir`, sorted.
pub fn object_ids(dir: &Path) -> io::Result<Vec<String>> {
    let mut ids = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            ids.push(stem.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

fn render_object(args: &BatchArgs, id: &str, i: usize) -> Result<(), RunError> {
    let class = args.class.as_str();
    let cloud_path = args.clouds.join(class).join(format!("{id}.npy"));
    let abstraction_path = args.abstractions.join(class).join(format!("{id}.json"));
    let result_dir: PathBuf = args.results.join(class);

    let input = cloud_panel(
        &cloud_path,
        args.cloud_view,
        Some("Input Point Cloud".to_string()),
        &args.render,
    )?;
    let cuboids = primitive_panel(
        &abstraction_path,
        args.primitive_view,
        None,
        &args.render,
    )?;

    save(&result_dir.join(format!("input{i}.svg")), &input.document())?;
    save(&result_dir.join(format!("cuboids{i}.svg")), &cuboids.document())?;
    save(
        &result_dir.join("combined").join(format!("combined{i}.svg")),
        &compose_side_by_side(&[input, cuboids]),
    )
}

/// Render input, primitives and their comparison for a random sample of
/// objects. Objects that fail to load are logged and skipped.
pub fn run(args: &BatchArgs) -> Result<BatchReport, RunError> {
    let listing = args.abstractions.join(args.class.as_str());
    let ids = object_ids(&listing).map_err(|source| RunError::List {
        path: listing.display().to_string(),
        source,
    })?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sample: Vec<&String> = ids.choose_multiple(&mut rng, args.count).collect();
    info!(
        class = args.class.as_str(),
        available = ids.len(),
        sampled = sample.len(),
        "starting batch"
    );

    let mut report = BatchReport::default();
    for (i, id) in sample.into_iter().enumerate() {
        match render_object(args, id, i) {
            Ok(()) => report.rendered.push(id.clone()),
            Err(e) => {
                warn!(object = %id, error = %e, "skipping object");
                report.failed.push(id.clone());
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use quadscribe::Camera;

    use super::*;
    use crate::cli::{Args, Command};

    const FIXTURES: &str = "../quadscribe/tests";

    fn layout(root: &Path) {
        let clouds = root.join("clouds/chair");
        let abstractions = root.join("abstractions/chair");
        fs::create_dir_all(&clouds).unwrap();
        fs::create_dir_all(&abstractions).unwrap();

        let fixtures = Path::new(FIXTURES);
        fs::copy(fixtures.join("square.npy"), clouds.join("a1.npy")).unwrap();
        fs::copy(fixtures.join("chair.json"), abstractions.join("a1.json")).unwrap();
        fs::copy(fixtures.join("square.npy"), clouds.join("b2.npy")).unwrap();
        fs::copy(fixtures.join("chair.json"), abstractions.join("b2.json")).unwrap();
        // no point cloud for this one
        fs::copy(fixtures.join("chair.json"), abstractions.join("c3.json")).unwrap();
        fs::write(abstractions.join("notes.txt"), "not an abstraction").unwrap();
    }

    fn batch_args(root: &Path, count: &str) -> BatchArgs {
        let root = root.to_str().unwrap();
        let args = Args::try_parse_from([
            "quadcli".to_string(),
            "batch".to_string(),
            "--class".to_string(),
            "chair".to_string(),
            "--clouds".to_string(),
            format!("{root}/clouds"),
            "--abstractions".to_string(),
            format!("{root}/abstractions"),
            "--results".to_string(),
            format!("{root}/results"),
            "--count".to_string(),
            count.to_string(),
            "--seed".to_string(),
            "7".to_string(),
            "--resolution".to_string(),
            "8".to_string(),
        ])
        .expect("valid arguments");
        match args.command {
            Command::Batch(batch) => batch,
            _ => panic!("Expected the batch command"),
        }
    }

    #[test]
    fn test_default_views() {
        let dir = tempfile::tempdir().unwrap();
        let args = batch_args(dir.path(), "1");
        assert_eq!(args.cloud_view, Camera::new(-90.0, 90.0));
        assert_eq!(args.primitive_view, Camera::default());
    }

    #[test]
    fn test_object_ids() {
        let dir = tempfile::tempdir().unwrap();
        layout(dir.path());
        let ids = object_ids(&dir.path().join("abstractions/chair")).unwrap();
        assert_eq!(ids, vec!["a1", "b2", "c3"]);
    }

    #[test]
    fn test_batch_renders_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        layout(dir.path());

        let report = run(&batch_args(dir.path(), "10")).unwrap();
        assert_eq!(report.rendered.len(), 2);
        assert_eq!(report.failed, vec!["c3".to_string()]);

        let results = dir.path().join("results/chair");
        let combined = fs::read_dir(results.join("combined")).unwrap().count();
        assert_eq!(combined, 2);
        let svg = fs::read_to_string(
            fs::read_dir(results.join("combined"))
                .unwrap()
                .next()
                .unwrap()
                .unwrap()
                .path(),
        )
        .unwrap();
        assert!(svg.contains("Input Point Cloud"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_batch_sample_is_seeded() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        layout(first.path());
        layout(second.path());

        let a = run(&batch_args(first.path(), "1")).unwrap();
        let b = run(&batch_args(second.path(), "1")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rendered.len() + a.failed.len(), 1);
    }

    #[test]
    fn test_missing_class_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&batch_args(dir.path(), "3")).is_err());
    }
}
