//! Launch pack: every generated document in one `.zip`

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::schema::{AssetsDoc, PlanDoc, ResearchDoc};

use super::DeliveryError;

pub const PACK_FILE_NAME: &str = "action-planner-pack.zip";
pub const PLAN_FILE_NAME: &str = "plan.json";

/// `generated_at=<UTC ISO-8601>Z`
pub fn meta_text(generated_at: DateTime<Utc>) -> String {
    format!("generated_at={}Z", generated_at.naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f"))
}

/// Build the deflated zip archive in memory
pub fn build_launch_pack(
    plan: &PlanDoc,
    research: Option<&ResearchDoc>,
    assets: &AssetsDoc,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, DeliveryError> {
    debug!(has_research = research.is_some(), "build_launch_pack: called");
    let mut entries: Vec<(&str, String)> = vec![(PLAN_FILE_NAME, plan.to_pretty_json()?)];
    if let Some(research) = research {
        entries.push(("research.json", research.to_pretty_json()?));
    }
    entries.push(("launch_email.md", assets.launch_email.clone()));
    entries.push(("social_posts.md", assets.social_posts.join("\n\n")));
    entries.push(("script_outline.md", assets.script_outline.clone()));
    entries.push(("weekly_checklist.md", assets.weekly_checklist.clone()));
    entries.push(("meta.txt", meta_text(generated_at)));

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in &entries {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

/// Write the pack and a standalone `plan.json` into `dir`
///
/// Returns the path of the archive.
pub fn write_launch_pack(
    dir: &Path,
    plan: &PlanDoc,
    research: Option<&ResearchDoc>,
    assets: &AssetsDoc,
) -> Result<PathBuf, DeliveryError> {
    debug!(?dir, "write_launch_pack: called");
    std::fs::create_dir_all(dir)?;
    let pack = build_launch_pack(plan, research, assets, Utc::now())?;
    let pack_path = dir.join(PACK_FILE_NAME);
    std::fs::write(&pack_path, pack)?;
    std::fs::write(dir.join(PLAN_FILE_NAME), plan.to_pretty_json()?)?;
    info!(path = %pack_path.display(), "write_launch_pack: launch pack written");
    Ok(pack_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::{assets_json, plan_json, research_json};
    use chrono::TimeZone;
    use std::io::Read;
    use zip::ZipArchive;
    use tempfile::TempDir;

    fn docs() -> (PlanDoc, ResearchDoc, AssetsDoc) {
        (
            PlanDoc::from_json(&plan_json().to_string()).unwrap(),
            ResearchDoc::from_json(&research_json().to_string()).unwrap(),
            serde_json::from_value(assets_json()).unwrap(),
        )
    }

    fn unpack(bytes: &[u8]) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                assert_eq!(file.compression(), CompressionMethod::Deflated);
                let mut content = String::new();
                file.read_to_string(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_meta_text() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 5).unwrap();
        assert_eq!(meta_text(at), "generated_at=2025-06-01T12:30:05.000000Z");
    }

    #[test]
    fn test_pack_contents() {
        let (plan, research, assets) = docs();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let bytes = build_launch_pack(&plan, Some(&research), &assets, at).unwrap();
        let files = unpack(&bytes);

        let names: Vec<&str> = files.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "plan.json",
                "research.json",
                "launch_email.md",
                "social_posts.md",
                "script_outline.md",
                "weekly_checklist.md",
                "meta.txt",
            ]
        );

        let posts = &files[3].1;
        assert_eq!(posts, &assets.social_posts.join("\n\n"));
        assert_eq!(PlanDoc::from_json(&files[0].1).unwrap(), plan);
    }

    #[test]
    fn test_pack_without_research() {
        let (plan, _, assets) = docs();
        let bytes = build_launch_pack(&plan, None, &assets, Utc::now()).unwrap();
        let files = unpack(&bytes);
        assert!(files.iter().all(|(n, _)| n != "research.json"));
        assert_eq!(files.len(), 6);
    }

    #[test]
    fn test_write_launch_pack() {
        let dir = TempDir::new().unwrap();
        let (plan, research, assets) = docs();
        let out = dir.path().join("out");

        let path = write_launch_pack(&out, &plan, Some(&research), &assets).unwrap();

        assert_eq!(path, out.join("action-planner-pack.zip"));
        assert!(path.exists());
        let standalone = std::fs::read_to_string(out.join("plan.json")).unwrap();
        assert_eq!(PlanDoc::from_json(&standalone).unwrap(), plan);
    }
}
