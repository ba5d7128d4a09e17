use std::sync::Arc;

use api::{Api, InMemoryApi};
use interview_core::model::{AudioPayload, SessionKind};
use interview_core::time::fixed_clock;
use services::AppServices;

#[tokio::test]
async fn hr_round_is_single_shot_per_question() {
    let backend = Arc::new(InMemoryApi::new());
    let services = AppServices::new(fixed_clock(), Api::from_impl(backend));

    let mut sessions = services.session_client();
    let session_id = sessions.start(SessionKind::Hr).await.unwrap().id().clone();

    let pipeline = services.submission_pipeline();
    let question = pipeline.next_hr_question(&session_id).await.unwrap();
    assert!(!question.question.is_empty());

    let review = pipeline
        .submit_hr_answer(
            &session_id,
            &AudioPayload::placeholder(),
            "My experience includes Python and SQL projects...",
        )
        .await
        .unwrap();
    assert_eq!(
        review.transcript,
        "My experience includes Python and SQL projects..."
    );
    assert!(review.metrics.get("words_per_min_approx").is_some());

    // Unlike the MCQ flow there is no auto-advance: the next question only
    // appears when explicitly asked for, and the backend has moved one turn.
    let follow_up = pipeline.next_hr_question(&session_id).await.unwrap();
    assert_ne!(follow_up.question, question.question);
}
