use std::collections::HashSet;

use serde::Serialize;

use crate::db::{LessonProgress, ModuleLessonRow, ModuleRecord, ProgressStatus, SqliteStore, StoreError};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub order_index: i64,
    pub published: bool,
    pub coming_soon: bool,
    pub lesson_count: usize,
    pub completed_lessons: usize,
    pub percent_complete: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub order_index: i64,
    pub estimated_minutes: i64,
    pub difficulty: i64,
    pub status: ProgressStatus,
    pub percent: u32,
    pub prerequisite_slugs: Vec<String>,
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDetail {
    #[serde(flatten)]
    pub module: ModuleRecord,
    pub lessons: Vec<LessonSummary>,
}

pub fn summarize_module(module: ModuleRecord, lessons: &[Option<LessonProgress>]) -> ModuleSummary {
    let lesson_count = lessons.len();
    let completed_lessons = lessons
        .iter()
        .flatten()
        .filter(|p| p.status == ProgressStatus::Completed)
        .count();
    let total_percent: u32 = lessons.iter().flatten().map(|p| p.percent).sum();
    let percent_complete = if lesson_count > 0 {
        (total_percent as f64 / lesson_count as f64).round() as u32
    } else {
        0
    };

    ModuleSummary {
        id: module.id,
        slug: module.slug,
        title: module.title,
        description: module.description,
        order_index: module.order_index,
        published: module.published,
        coming_soon: module.coming_soon,
        lesson_count,
        completed_lessons,
        percent_complete,
    }
}

/// A lesson is locked while any prerequisite is not in `completed`.
pub fn summarize_lessons(rows: Vec<ModuleLessonRow>, completed: &HashSet<String>) -> Vec<LessonSummary> {
    rows.into_iter()
        .map(|row| {
            let locked = row.prerequisites.iter().any(|p| !completed.contains(&p.id));
            let progress = row.progress.unwrap_or(LessonProgress {
                status: ProgressStatus::NotStarted,
                percent: 0,
            });
            LessonSummary {
                id: row.id,
                slug: row.slug,
                title: row.title,
                summary: row.summary,
                order_index: row.order_index,
                estimated_minutes: row.estimated_minutes,
                difficulty: row.difficulty,
                status: progress.status,
                percent: progress.percent,
                prerequisite_slugs: row.prerequisites.into_iter().map(|p| p.slug).collect(),
                locked,
            }
        })
        .collect()
}

pub async fn module_summaries(
    store: &SqliteStore,
    user_id: &str,
    track: &str,
) -> Result<Vec<ModuleSummary>, StoreError> {
    let modules = store.modules_with_progress(user_id, track).await?;
    Ok(modules
        .into_iter()
        .map(|(module, lessons)| summarize_module(module, &lessons))
        .collect())
}

pub async fn module_detail(
    store: &SqliteStore,
    slug: &str,
    user_id: &str,
) -> Result<Option<ModuleDetail>, StoreError> {
    let Some(module) = store.module_by_slug(slug).await? else {
        return Ok(None);
    };

    let rows = store.module_lessons(&module.id, user_id).await?;
    // prerequisites may live in other modules
    let completed: HashSet<String> = store.completed_lesson_ids(user_id).await?.into_iter().collect();

    Ok(Some(ModuleDetail {
        lessons: summarize_lessons(rows, &completed),
        module,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::EntityRef;

    fn module() -> ModuleRecord {
        ModuleRecord {
            id: "m1".to_string(),
            slug: "web-basics".to_string(),
            title: "Web Basics".to_string(),
            description: String::new(),
            order_index: 1,
            published: true,
            coming_soon: false,
            track: "WEB".to_string(),
        }
    }

    fn row(id: &str, prerequisites: &[&str], progress: Option<LessonProgress>) -> ModuleLessonRow {
        ModuleLessonRow {
            id: id.to_string(),
            slug: format!("{id}-slug"),
            title: id.to_string(),
            summary: String::new(),
            order_index: 0,
            estimated_minutes: 10,
            difficulty: 1,
            prerequisites: prerequisites
                .iter()
                .map(|p| EntityRef {
                    id: p.to_string(),
                    slug: format!("{p}-slug"),
                    title: p.to_string(),
                })
                .collect(),
            progress,
        }
    }

    #[test]
    fn test_module_percent_rounds_average() {
        let lessons = vec![
            Some(LessonProgress { status: ProgressStatus::Completed, percent: 100 }),
            Some(LessonProgress { status: ProgressStatus::InProgress, percent: 50 }),
            None,
        ];
        let summary = summarize_module(module(), &lessons);
        assert_eq!(summary.lesson_count, 3);
        assert_eq!(summary.completed_lessons, 1);
        assert_eq!(summary.percent_complete, 50);
    }

    #[test]
    fn test_empty_module_is_zero_percent() {
        let summary = summarize_module(module(), &[]);
        assert_eq!(summary.percent_complete, 0);
        assert_eq!(summary.lesson_count, 0);
    }

    #[test]
    fn test_lessons_lock_until_prerequisites_complete() {
        let completed: HashSet<String> = ["a".to_string()].into_iter().collect();
        let lessons = summarize_lessons(
            vec![row("b", &["a"], None), row("c", &["a", "b"], None), row("d", &[], None)],
            &completed,
        );
        assert!(!lessons[0].locked);
        assert!(lessons[1].locked);
        assert!(!lessons[2].locked);
        assert_eq!(lessons[1].prerequisite_slugs, vec!["a-slug", "b-slug"]);
        assert_eq!(lessons[0].status, ProgressStatus::NotStarted);
    }
}
