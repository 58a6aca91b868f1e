//! Lessons command implementation

use anyhow::{Context, Result};

use ranch_academy::catalog;

/// List the catalog, or show one lesson's steps
pub async fn lessons_command(id: Option<u32>) -> Result<()> {
    let catalog = catalog::builtin();

    let Some(id) = id else {
        println!("Lessons ({}):\n", catalog.len());
        for lesson in catalog.all_lessons() {
            let premium = if lesson.premium { " [premium]" } else { "" };
            println!(
                "  #{} {} ({}, {} min, {} steps){}",
                lesson.id,
                lesson.title,
                lesson.difficulty,
                lesson.estimated_minutes,
                lesson.step_count(),
                premium
            );
            if !lesson.required_lessons.is_empty() {
                let required: Vec<String> =
                    lesson.required_lessons.iter().map(|r| format!("#{}", r)).collect();
                println!("    Requires: {}", required.join(", "));
            }
        }
        return Ok(());
    };

    let lesson = catalog
        .get_lesson(id)
        .with_context(|| format!("Lesson {} not found", id))?;

    println!("#{} {}", lesson.id, lesson.title);
    println!("{}\n", lesson.description);
    println!("Reward: {} coins", lesson.reward);
    if let Some(badge) = &lesson.badge {
        println!("Badge: {}", badge.name);
    }
    println!();

    for step in &lesson.steps {
        let kind = if step.requires_code { "code" } else { "quiz" };
        println!("  {}. {} [{}]", step.id, step.title, kind);
        println!("     {}", step.challenge);
        if let Some(quiz) = &step.quiz {
            println!("     Q: {}", quiz.question);
            for option in &quiz.options {
                println!("        - {}", option);
            }
        }
    }

    Ok(())
}
