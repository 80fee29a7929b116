//! Skill extraction: flattens the four skill buckets into display names.

use serde::Serialize;

use crate::models::cv::{SkillBucket, SkillEntry, Skills};

/// Display name of a single entry, or `None` when it would render blank.
pub fn display_name(entry: &SkillEntry) -> Option<&str> {
    let name = entry.name().trim();
    (!name.is_empty()).then_some(name)
}

/// All skill names in bucket order (technical, soft, creative, analytical),
/// preserving insertion order within a bucket. Blank names are skipped;
/// duplicates are kept.
pub fn extract_skill_names(skills: &Skills) -> Vec<String> {
    SkillBucket::ALL
        .into_iter()
        .flat_map(|bucket| bucket_names(skills, bucket))
        .collect()
}

fn bucket_names(skills: &Skills, bucket: SkillBucket) -> Vec<String> {
    skills
        .bucket(bucket)
        .iter()
        .filter_map(display_name)
        .map(str::to_string)
        .collect()
}

/// Skill names of one non-empty bucket, for per-category layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGroup {
    pub bucket: SkillBucket,
    pub names: Vec<String>,
}

/// Per-category view of the skills; buckets with no renderable names are omitted.
pub fn group_skill_names(skills: &Skills) -> Vec<SkillGroup> {
    SkillBucket::ALL
        .into_iter()
        .map(|bucket| SkillGroup {
            bucket,
            names: bucket_names(skills, bucket),
        })
        .filter(|group| !group.names.is_empty())
        .collect()
}
