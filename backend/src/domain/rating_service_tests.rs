//! Tests for the rating aggregation engine.

use chrono::Utc;
use mockable::DefaultClock;

use super::*;
use crate::domain::error::ErrorCode;
use crate::domain::feedback::{CategoryRatings, Rating};
use crate::domain::ports::{MockFeedbackRepository, MockSwapRepository, MockUserDirectory};
use crate::domain::skill::{SkillDescriptor, SkillName};
use crate::domain::swap::{Participant, Swap, SwapDraft, SwapId};

fn descriptor(name: &str) -> SkillDescriptor {
    SkillDescriptor::new(SkillName::new(name).expect("valid skill name"))
}

fn completed_swap(requester: &UserId, provider: &UserId) -> Swap {
    let mut swap = Swap::new(SwapDraft {
        id: SwapId::random(),
        requester: requester.clone(),
        provider: provider.clone(),
        offered: descriptor("Woodworking"),
        requested: descriptor("Guitar"),
        message: None,
        scheduled_date: None,
        created_at: Utc::now(),
    })
    .expect("valid swap");
    swap.accept().expect("accept from pending");
    swap.start().expect("start from accepted");
    swap.record_completion(Participant::Requester, Utc::now())
        .expect("requester marks completion");
    swap.record_completion(Participant::Provider, Utc::now())
        .expect("provider marks completion");
    swap
}

fn rating(value: u8) -> Rating {
    Rating::new(value).expect("valid rating")
}

fn feedback_about(reviewee: &UserId, value: u8) -> Feedback {
    Feedback::new(FeedbackDraft {
        id: FeedbackId::random(),
        swap_id: SwapId::random(),
        reviewer: UserId::random(),
        reviewee: reviewee.clone(),
        rating: rating(value),
        comment: None,
        categories: CategoryRatings::default(),
        created_at: Utc::now(),
    })
    .expect("valid feedback")
}

fn service(
    feedback: MockFeedbackRepository,
    swaps: MockSwapRepository,
    directory: MockUserDirectory,
) -> RatingService<MockFeedbackRepository, MockSwapRepository, MockUserDirectory> {
    RatingService::new(
        Arc::new(feedback),
        Arc::new(swaps),
        Arc::new(directory),
        Arc::new(DefaultClock),
    )
}

fn submit_request(swap: &Swap, reviewer: &UserId, value: u8) -> SubmitFeedbackRequest {
    SubmitFeedbackRequest {
        swap_id: swap.id().clone(),
        reviewer: reviewer.clone(),
        rating: rating(value),
        comment: Some("great session".to_owned()),
        categories: CategoryRatings::default(),
    }
}

#[tokio::test]
async fn submit_requires_a_completed_swap() {
    let requester = UserId::random();
    let provider = UserId::random();
    let mut swap = Swap::new(SwapDraft {
        id: SwapId::random(),
        requester: requester.clone(),
        provider: provider.clone(),
        offered: descriptor("Woodworking"),
        requested: descriptor("Guitar"),
        message: None,
        scheduled_date: None,
        created_at: Utc::now(),
    })
    .expect("valid swap");
    swap.accept().expect("accept from pending");
    swap.start().expect("start from accepted");
    let request = submit_request(&swap, &requester, 5);

    let mut swaps = MockSwapRepository::new();
    swaps
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(swap)));

    let service = service(MockFeedbackRepository::new(), swaps, MockUserDirectory::new());
    let error = service
        .submit_feedback(request)
        .await
        .expect_err("in-progress swaps cannot be reviewed");
    assert_eq!(error.code(), ErrorCode::IllegalState);
}

#[tokio::test]
async fn submit_requires_a_participant() {
    let swap = completed_swap(&UserId::random(), &UserId::random());
    let request = submit_request(&swap, &UserId::random(), 5);

    let mut swaps = MockSwapRepository::new();
    swaps
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(swap)));

    let service = service(MockFeedbackRepository::new(), swaps, MockUserDirectory::new());
    let error = service
        .submit_feedback(request)
        .await
        .expect_err("strangers cannot review");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn submit_rejects_duplicates_regardless_of_content() {
    let requester = UserId::random();
    let provider = UserId::random();
    let swap = completed_swap(&requester, &provider);
    let existing = feedback_about(&provider, 5);
    // A different rating and comment still count as a duplicate.
    let request = submit_request(&swap, &requester, 2);

    let mut swaps = MockSwapRepository::new();
    swaps
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(swap)));

    let mut feedback = MockFeedbackRepository::new();
    feedback
        .expect_find_by_swap_and_reviewer()
        .times(1)
        .return_once(move |_, _| Ok(Some(existing)));

    let service = service(feedback, swaps, MockUserDirectory::new());
    let error = service
        .submit_feedback(request)
        .await
        .expect_err("second submission refused");
    assert_eq!(error.code(), ErrorCode::DuplicateFeedback);
}

#[tokio::test]
async fn submit_persists_and_recomputes_the_reviewee() {
    let requester = UserId::random();
    let provider = UserId::random();
    let swap = completed_swap(&requester, &provider);
    let request = submit_request(&swap, &requester, 5);

    let mut swaps = MockSwapRepository::new();
    swaps
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(swap)));

    let mut feedback = MockFeedbackRepository::new();
    feedback
        .expect_find_by_swap_and_reviewer()
        .times(1)
        .return_once(|_, _| Ok(None));
    let provider_clone = provider.clone();
    feedback
        .expect_insert()
        .withf(move |record| record.reviewee() == &provider_clone && record.rating().value() == 5)
        .times(1)
        .return_once(|_| Ok(()));
    let stored = feedback_about(&provider, 5);
    feedback
        .expect_list_for_reviewee()
        .times(1)
        .return_once(move |_| Ok(vec![stored]));

    let mut directory = MockUserDirectory::new();
    let provider_clone = provider.clone();
    directory
        .expect_update_rating_summary()
        .withf(move |id, summary| {
            *id == provider_clone
                && summary.count() == 1
                && (summary.average() - 5.0).abs() < f64::EPSILON
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = service(feedback, swaps, directory);
    let record = service
        .submit_feedback(request)
        .await
        .expect("submission succeeds");
    assert_eq!(record.reviewee(), &provider);
    assert_eq!(record.reviewer(), &requester);
}

#[tokio::test]
async fn submit_maps_an_insert_race_to_duplicate_feedback() {
    let requester = UserId::random();
    let provider = UserId::random();
    let swap = completed_swap(&requester, &provider);
    let request = submit_request(&swap, &requester, 4);

    let mut swaps = MockSwapRepository::new();
    swaps
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(swap)));

    let mut feedback = MockFeedbackRepository::new();
    feedback
        .expect_find_by_swap_and_reviewer()
        .times(1)
        .return_once(|_, _| Ok(None));
    feedback
        .expect_insert()
        .times(1)
        .return_once(|_| Err(FeedbackPersistenceError::DuplicateFeedback));

    let service = service(feedback, swaps, MockUserDirectory::new());
    let error = service
        .submit_feedback(request)
        .await
        .expect_err("unique index wins the race");
    assert_eq!(error.code(), ErrorCode::DuplicateFeedback);
}

#[tokio::test]
async fn edit_is_reviewer_only() {
    let reviewee = UserId::random();
    let record = feedback_about(&reviewee, 4);
    let feedback_id = record.id().clone();

    let mut feedback = MockFeedbackRepository::new();
    feedback
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(record)));

    let service = service(feedback, MockSwapRepository::new(), MockUserDirectory::new());
    let error = service
        .edit_feedback(EditFeedbackRequest {
            feedback_id,
            reviewer: UserId::random(),
            rating: Some(rating(1)),
            comment: None,
            categories: None,
        })
        .await
        .expect_err("only the author edits");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn edit_updates_the_rating_and_recomputes() {
    let reviewee = UserId::random();
    let record = feedback_about(&reviewee, 4);
    let reviewer = record.reviewer().clone();
    let feedback_id = record.id().clone();

    let mut feedback = MockFeedbackRepository::new();
    let loaded = record.clone();
    feedback
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    feedback
        .expect_update()
        .withf(|record| record.rating().value() == 2)
        .times(1)
        .return_once(|_| Ok(()));
    let mut edited = record;
    edited.set_rating(rating(2));
    feedback
        .expect_list_for_reviewee()
        .times(1)
        .return_once(move |_| Ok(vec![edited]));

    let mut directory = MockUserDirectory::new();
    directory
        .expect_update_rating_summary()
        .withf(|_, summary| summary.count() == 1 && (summary.average() - 2.0).abs() < f64::EPSILON)
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = service(feedback, MockSwapRepository::new(), directory);
    let updated = service
        .edit_feedback(EditFeedbackRequest {
            feedback_id,
            reviewer,
            rating: Some(rating(2)),
            comment: None,
            categories: None,
        })
        .await
        .expect("edit succeeds");
    assert_eq!(updated.rating().value(), 2);
}

#[tokio::test]
async fn delete_recomputes_to_an_empty_aggregate() {
    let reviewee = UserId::random();
    let record = feedback_about(&reviewee, 5);
    let reviewer = record.reviewer().clone();
    let feedback_id = record.id().clone();

    let mut feedback = MockFeedbackRepository::new();
    feedback
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(record)));
    feedback.expect_delete().times(1).return_once(|_| Ok(()));
    feedback
        .expect_list_for_reviewee()
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let mut directory = MockUserDirectory::new();
    let reviewee_clone = reviewee.clone();
    directory
        .expect_update_rating_summary()
        .withf(move |id, summary| *id == reviewee_clone && *summary == RatingSummary::empty())
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = service(feedback, MockSwapRepository::new(), directory);
    service
        .delete_feedback(&feedback_id, &reviewer)
        .await
        .expect("delete succeeds");
}

#[tokio::test]
async fn flagging_excludes_the_record_from_the_aggregate() {
    let reviewee = UserId::random();
    let record = feedback_about(&reviewee, 1);
    let feedback_id = record.id().clone();

    let mut feedback = MockFeedbackRepository::new();
    let loaded = record.clone();
    feedback
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    feedback
        .expect_update()
        .withf(|record| record.flagged() && record.flag_reason() == Some("retaliatory"))
        .times(1)
        .return_once(|_| Ok(()));
    let mut flagged = record;
    flagged.flag("retaliatory");
    feedback
        .expect_list_for_reviewee()
        .times(1)
        .return_once(move |_| Ok(vec![flagged]));

    let mut directory = MockUserDirectory::new();
    directory
        .expect_update_rating_summary()
        .withf(|_, summary| *summary == RatingSummary::empty())
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = service(feedback, MockSwapRepository::new(), directory);
    let flagged = service
        .flag_feedback(&feedback_id, "retaliatory")
        .await
        .expect("flag succeeds");
    assert!(flagged.flagged());
    assert!(flagged.admin_reviewed());
}

#[tokio::test]
async fn unflagging_restores_the_record_to_the_aggregate() {
    let reviewee = UserId::random();
    let mut record = feedback_about(&reviewee, 4);
    record.flag("mistake");
    let feedback_id = record.id().clone();

    let mut feedback = MockFeedbackRepository::new();
    let loaded = record.clone();
    feedback
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    feedback
        .expect_update()
        .withf(|record| !record.flagged())
        .times(1)
        .return_once(|_| Ok(()));
    let mut restored = record;
    restored.unflag();
    feedback
        .expect_list_for_reviewee()
        .times(1)
        .return_once(move |_| Ok(vec![restored]));

    let mut directory = MockUserDirectory::new();
    directory
        .expect_update_rating_summary()
        .withf(|_, summary| summary.count() == 1 && (summary.average() - 4.0).abs() < f64::EPSILON)
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = service(feedback, MockSwapRepository::new(), directory);
    let restored = service
        .unflag_feedback(&feedback_id)
        .await
        .expect("unflag succeeds");
    assert!(!restored.flagged());
}

#[tokio::test]
async fn recompute_averages_only_non_flagged_feedback() {
    let reviewee = UserId::random();
    let mut hidden = feedback_about(&reviewee, 1);
    hidden.flag("abusive");
    let set = vec![
        feedback_about(&reviewee, 5),
        feedback_about(&reviewee, 4),
        feedback_about(&reviewee, 3),
        hidden,
    ];

    let mut feedback = MockFeedbackRepository::new();
    feedback
        .expect_list_for_reviewee()
        .times(1)
        .return_once(move |_| Ok(set));

    let mut directory = MockUserDirectory::new();
    directory
        .expect_update_rating_summary()
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = service(feedback, MockSwapRepository::new(), directory);
    let summary = service
        .recompute(&reviewee)
        .await
        .expect("recompute succeeds");
    assert_eq!(summary.count(), 3);
    assert!((summary.average() - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn feedback_summary_reports_distribution_without_flagged_records() {
    let reviewee = UserId::random();
    let mut hidden = feedback_about(&reviewee, 1);
    hidden.flag("spam");
    let set = vec![
        feedback_about(&reviewee, 5),
        feedback_about(&reviewee, 4),
        hidden,
    ];

    let mut feedback = MockFeedbackRepository::new();
    feedback
        .expect_list_for_reviewee()
        .times(1)
        .return_once(move |_| Ok(set));

    let service = service(feedback, MockSwapRepository::new(), MockUserDirectory::new());
    let summary = service
        .feedback_summary(&reviewee)
        .await
        .expect("summary succeeds");
    assert_eq!(summary.total, 2);
    assert!((summary.average - 4.5).abs() < f64::EPSILON);
    assert_eq!(summary.distribution.count_for(rating(5)), 1);
    assert_eq!(summary.distribution.count_for(rating(4)), 1);
    assert_eq!(summary.distribution.count_for(rating(1)), 0);
}
