//! Shared wiring for integration tests: the three engines over the in-memory
//! adapters, plus seeding helpers.

use std::sync::Arc;

use mockable::DefaultClock;
use swapskill_backend::domain::ports::{CreateSwapRequest, SwapLifecycle};
use swapskill_backend::domain::{
    ModerationService, RatingService, SkillDescriptor, SkillName, SwapId, SwapLifecycleService,
    UserId, UserProfile,
};
use swapskill_backend::outbound::memory::{
    InMemoryFeedbackRepository, InMemorySwapRepository, InMemoryUserDirectory,
};

pub type Lifecycle = SwapLifecycleService<InMemorySwapRepository, InMemoryUserDirectory>;
pub type Ratings =
    RatingService<InMemoryFeedbackRepository, InMemorySwapRepository, InMemoryUserDirectory>;
pub type Mods = ModerationService<Lifecycle, Ratings, InMemoryUserDirectory>;

pub struct Harness {
    pub directory: Arc<InMemoryUserDirectory>,
    pub swaps: Arc<InMemorySwapRepository>,
    pub lifecycle: Arc<Lifecycle>,
    pub ratings: Arc<Ratings>,
    pub moderation: Mods,
}

impl Harness {
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryUserDirectory::new());
        let swaps = Arc::new(InMemorySwapRepository::new());
        let feedback = Arc::new(InMemoryFeedbackRepository::new());
        let lifecycle = Arc::new(SwapLifecycleService::new(
            Arc::clone(&swaps),
            Arc::clone(&directory),
            Arc::new(DefaultClock),
        ));
        let ratings = Arc::new(RatingService::new(
            Arc::clone(&feedback),
            Arc::clone(&swaps),
            Arc::clone(&directory),
            Arc::new(DefaultClock),
        ));
        let moderation = ModerationService::new(
            Arc::clone(&lifecycle),
            Arc::clone(&ratings),
            Arc::clone(&directory),
            Arc::new(DefaultClock),
        );
        Self {
            directory,
            swaps,
            lifecycle,
            ratings,
            moderation,
        }
    }

    /// Seed an active member advertising the given skills.
    pub async fn seed_member(&self, name: &str, offers: &[&str]) -> UserId {
        let id = UserId::random();
        let profile = UserProfile::new(id.clone(), name).with_offered_skills(
            offers
                .iter()
                .map(|skill| SkillName::new(*skill).expect("valid skill name"))
                .collect(),
        );
        self.directory.insert(profile).await;
        id
    }

    /// Seed an administrator.
    pub async fn seed_admin(&self, name: &str) -> UserId {
        let id = UserId::random();
        self.directory
            .insert(UserProfile::new(id.clone(), name).as_admin())
            .await;
        id
    }

    /// Fetch a profile that is known to exist.
    pub async fn profile(&self, id: &UserId) -> UserProfile {
        use swapskill_backend::domain::ports::UserDirectory;
        self.directory
            .get(id)
            .await
            .expect("directory lookup succeeds")
            .expect("profile exists")
    }

    /// Create a pending request from `requester` offering "Woodworking" for
    /// the provider's "Guitar".
    pub async fn create_default_request(&self, requester: &UserId, provider: &UserId) -> SwapId {
        let swap = self
            .lifecycle
            .create_request(default_request(requester, provider))
            .await
            .expect("create succeeds");
        swap.id().clone()
    }

    /// Drive a freshly created request to `in_progress`.
    pub async fn start_swap(&self, requester: &UserId, provider: &UserId) -> SwapId {
        let swap_id = self.create_default_request(requester, provider).await;
        self.lifecycle
            .accept(&swap_id, provider)
            .await
            .expect("accept succeeds");
        self.lifecycle
            .start(&swap_id, requester)
            .await
            .expect("start succeeds");
        swap_id
    }

    /// Drive a freshly created request all the way to `completed`.
    pub async fn complete_swap(&self, requester: &UserId, provider: &UserId) -> SwapId {
        let swap_id = self.start_swap(requester, provider).await;
        self.lifecycle
            .mark_completed(&swap_id, requester)
            .await
            .expect("requester confirmation succeeds");
        self.lifecycle
            .mark_completed(&swap_id, provider)
            .await
            .expect("provider confirmation succeeds");
        swap_id
    }
}

pub fn descriptor(name: &str) -> SkillDescriptor {
    SkillDescriptor::new(SkillName::new(name).expect("valid skill name"))
}

pub fn default_request(requester: &UserId, provider: &UserId) -> CreateSwapRequest {
    CreateSwapRequest {
        requester: requester.clone(),
        provider: provider.clone(),
        offered: descriptor("Woodworking"),
        requested: descriptor("Guitar"),
        message: Some("evenings work best".to_owned()),
        scheduled_date: None,
    }
}
