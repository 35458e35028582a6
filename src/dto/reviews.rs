use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Review, ReviewImage, ReviewResponse, ReviewVote};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub title: String,
    pub content: String,
    /// Integer rating in [1, 5].
    pub rating: i32,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub pros: String,
    #[serde(default)]
    pub cons: String,
    #[serde(default = "default_true")]
    pub would_recommend: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CastVoteRequest {
    pub vote_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewResponseRequest {
    pub content: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewImageRequest {
    pub image: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ModerateReviewRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDetail {
    pub review: Review,
    /// Rating rendered as stars for display, e.g. "★★★☆☆".
    pub stars: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub items: Vec<ReviewDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewImageList {
    pub items: Vec<ReviewImage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoteData {
    pub vote: ReviewVote,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResponseData {
    pub response: ReviewResponse,
}
