//! Integration tests driving the rating aggregation engine through the
//! in-memory adapters.

mod support;

use support::Harness;
use swapskill_backend::domain::ports::{
    EditFeedbackRequest, Moderation, RatingEngine, SubmitFeedbackRequest,
};
use swapskill_backend::domain::{CategoryRatings, ErrorCode, Rating, SwapId, UserId};

fn rating(value: u8) -> Rating {
    Rating::new(value).expect("valid rating")
}

fn submission(swap_id: &SwapId, reviewer: &UserId, value: u8) -> SubmitFeedbackRequest {
    SubmitFeedbackRequest {
        swap_id: swap_id.clone(),
        reviewer: reviewer.clone(),
        rating: rating(value),
        comment: Some("great session".to_owned()),
        categories: CategoryRatings::default(),
    }
}

#[tokio::test]
async fn both_participants_review_and_averages_update() {
    let h = Harness::new();
    let requester = h.seed_member("Ada", &["Woodworking"]).await;
    let provider = h.seed_member("Grace", &["Guitar"]).await;
    let swap_id = h.complete_swap(&requester, &provider).await;

    let about_provider = h
        .ratings
        .submit_feedback(submission(&swap_id, &requester, 5))
        .await
        .expect("requester review succeeds");
    assert_eq!(about_provider.reviewee(), &provider);

    let about_requester = h
        .ratings
        .submit_feedback(submission(&swap_id, &provider, 3))
        .await
        .expect("provider review succeeds");
    assert_eq!(about_requester.reviewee(), &requester);

    let provider_rating = h.profile(&provider).await.rating();
    assert_eq!(provider_rating.count(), 1);
    assert!((provider_rating.average() - 5.0).abs() < f64::EPSILON);

    let requester_rating = h.profile(&requester).await.rating();
    assert_eq!(requester_rating.count(), 1);
    assert!((requester_rating.average() - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn reviews_require_a_completed_swap() {
    let h = Harness::new();
    let requester = h.seed_member("Ada", &["Woodworking"]).await;
    let provider = h.seed_member("Grace", &["Guitar"]).await;
    let swap_id = h.start_swap(&requester, &provider).await;

    let error = h
        .ratings
        .submit_feedback(submission(&swap_id, &requester, 5))
        .await
        .expect_err("in-progress swaps cannot be reviewed");
    assert_eq!(error.code(), ErrorCode::IllegalState);
}

#[tokio::test]
async fn duplicate_reviews_are_refused_even_with_new_content() {
    let h = Harness::new();
    let requester = h.seed_member("Ada", &["Woodworking"]).await;
    let provider = h.seed_member("Grace", &["Guitar"]).await;
    let swap_id = h.complete_swap(&requester, &provider).await;

    h.ratings
        .submit_feedback(submission(&swap_id, &requester, 5))
        .await
        .expect("first review succeeds");
    let error = h
        .ratings
        .submit_feedback(submission(&swap_id, &requester, 1))
        .await
        .expect_err("second review refused");
    assert_eq!(error.code(), ErrorCode::DuplicateFeedback);
}

#[tokio::test]
async fn concurrent_duplicate_reviews_store_exactly_one_record() {
    let h = Harness::new();
    let requester = h.seed_member("Ada", &["Woodworking"]).await;
    let provider = h.seed_member("Grace", &["Guitar"]).await;
    let swap_id = h.complete_swap(&requester, &provider).await;

    let (first, second) = tokio::join!(
        h.ratings.submit_feedback(submission(&swap_id, &requester, 5)),
        h.ratings.submit_feedback(submission(&swap_id, &requester, 4)),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one submission wins");
    for result in [first, second] {
        if let Err(error) = result {
            assert_eq!(error.code(), ErrorCode::DuplicateFeedback);
        }
    }

    let summary = h
        .ratings
        .feedback_summary(&provider)
        .await
        .expect("summary succeeds");
    assert_eq!(summary.total, 1);
}

#[tokio::test]
async fn editing_a_review_moves_the_average() {
    let h = Harness::new();
    let requester = h.seed_member("Ada", &["Woodworking"]).await;
    let provider = h.seed_member("Grace", &["Guitar"]).await;
    let swap_id = h.complete_swap(&requester, &provider).await;

    let review = h
        .ratings
        .submit_feedback(submission(&swap_id, &requester, 5))
        .await
        .expect("review succeeds");

    h.ratings
        .edit_feedback(EditFeedbackRequest {
            feedback_id: review.id().clone(),
            reviewer: requester.clone(),
            rating: Some(rating(2)),
            comment: None,
            categories: None,
        })
        .await
        .expect("edit succeeds");

    let provider_rating = h.profile(&provider).await.rating();
    assert!((provider_rating.average() - 2.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn flagging_and_unflagging_move_the_aggregate() {
    let h = Harness::new();
    let requester = h.seed_member("Ada", &["Woodworking"]).await;
    let provider = h.seed_member("Grace", &["Guitar"]).await;
    let swap_id = h.complete_swap(&requester, &provider).await;

    let review = h
        .ratings
        .submit_feedback(submission(&swap_id, &requester, 5))
        .await
        .expect("review succeeds");
    assert_eq!(h.profile(&provider).await.rating().count(), 1);

    h.moderation
        .flag_feedback(review.id(), "retaliatory")
        .await
        .expect("flag succeeds");
    let hidden = h.profile(&provider).await.rating();
    assert_eq!(hidden.count(), 0);
    assert!((hidden.average() - 0.0).abs() < f64::EPSILON);

    h.ratings
        .unflag_feedback(review.id())
        .await
        .expect("unflag succeeds");
    let restored = h.profile(&provider).await.rating();
    assert_eq!(restored.count(), 1);
    assert!((restored.average() - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn deleting_the_last_review_resets_the_aggregate() {
    let h = Harness::new();
    let requester = h.seed_member("Ada", &["Woodworking"]).await;
    let provider = h.seed_member("Grace", &["Guitar"]).await;
    let swap_id = h.complete_swap(&requester, &provider).await;

    let review = h
        .ratings
        .submit_feedback(submission(&swap_id, &requester, 4))
        .await
        .expect("review succeeds");

    h.ratings
        .delete_feedback(review.id(), &requester)
        .await
        .expect("delete succeeds");

    let reset = h.profile(&provider).await.rating();
    assert_eq!(reset.count(), 0);
    assert!((reset.average() - 0.0).abs() < f64::EPSILON);
}
