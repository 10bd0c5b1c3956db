use chrono::{DateTime, Utc};

use crate::engine::{CheckpointDetail, CheckpointSummary, Progress};
use crate::models::{Project, Session, Step};

fn stamp(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}

pub fn print_project_list(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }
    for p in projects {
        println!("  {} - {} (created {})", p.slug, p.name, stamp(&p.created_at));
    }
}

pub fn print_progress(p: &Progress) {
    println!(
        "Progress: {:.1}% ({}/{} steps, {}/{} objectives)",
        p.percentage, p.steps_complete, p.steps_total, p.objectives_complete, p.objectives_total
    );
}

pub fn print_checkpoint_list(checkpoints: &[CheckpointSummary]) {
    if checkpoints.is_empty() {
        println!("No checkpoints found.");
        return;
    }
    for c in checkpoints {
        println!(
            "  [{}] {} (phase {}) {} - {:.1}% {}min",
            c.checkpoint.status.as_str(),
            c.checkpoint.key,
            c.checkpoint.phase,
            c.checkpoint.title,
            c.progress.percentage,
            c.checkpoint.actual_mins
        );
    }
}

pub fn print_checkpoint_detail(d: &CheckpointDetail) {
    let cp = &d.checkpoint;
    println!("Checkpoint: {} - {} ({})", cp.key, cp.title, cp.status.as_str());
    println!("  Phase: {}", cp.phase);
    if let Some(est) = cp.estimated_mins {
        println!("  Estimated: {est}min");
    }
    println!("  Actual: {}min", cp.actual_mins);
    if let Some(ref started) = cp.started_at {
        println!("  Started: {}", stamp(started));
    }
    if let Some(ref completed) = cp.completed_at {
        println!("  Completed: {}", stamp(completed));
    }
    if let Some(ref active) = d.active_session {
        println!("  Running session: {} ({}min)", active.session.id, active.elapsed_mins);
    }
    print_progress(&d.progress);
    for ob in &d.objectives {
        println!("\n  [{}] {} - {}", ob.objective.status.as_str(), ob.objective.key, ob.objective.title);
        for s in &ob.steps {
            print_step_line(s);
        }
    }
}

fn print_step_line(s: &Step) {
    println!("      [{}] {} - {}", s.status.as_str(), s.key, s.title);
}

pub fn print_session(s: &Session) {
    let ended = if s.is_open() {
        "running".to_string()
    } else {
        s.ended_at.as_ref().map(stamp).unwrap_or_default()
    };
    let duration = s
        .duration_mins
        .map(|m| format!("{m}min"))
        .unwrap_or_else(|| "-".to_string());
    println!("  {} {} → {} {}", s.id, stamp(&s.started_at), ended, duration);
    if let Some(ref notes) = s.notes {
        println!("      {notes}");
    }
}

pub fn print_session_list(sessions: &[Session]) {
    if sessions.is_empty() {
        println!("No sessions found.");
        return;
    }
    for s in sessions {
        print_session(s);
    }
}
