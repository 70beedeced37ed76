//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `qna_core` linkage and run one deletion end to end.
//! - Keep output deterministic apart from generated ids.

use qna_core::db::open_db_in_memory;
use qna_core::{Identity, QuestionService, SqliteQuestionRepository};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("qna_core ping={}", qna_core::ping());
    println!("qna_core version={}", qna_core::core_version());

    match run_demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_demo() -> Result<(), Box<dyn Error>> {
    let mut conn = open_db_in_memory()?;
    let repo = SqliteQuestionRepository::try_new(&mut conn)?;
    let mut service = QuestionService::new(repo);

    let owner = Identity::generate();
    let stranger = Identity::generate();

    let question = service.create_question("How do I delete?", "Asking for a friend.", Some(owner))?;
    service.add_answer(question.id(), Some(owner), "Carefully.")?;

    match service.delete_question(question.id(), Some(stranger)) {
        Ok(_) => return Err("stranger deletion unexpectedly succeeded".into()),
        Err(err) => println!("stranger delete rejected: {err}"),
    }

    let histories = service.delete_question(question.id(), Some(owner))?;
    for history in &histories {
        println!(
            "deleted {} {} by {} at {}",
            history.content_type(),
            history.content_id(),
            history.deleted_by(),
            history.created_at()
        );
    }
    Ok(())
}
