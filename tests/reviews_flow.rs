mod support;

use petstore_api::{
    dto::reviews::{
        CastVoteRequest, CreateReviewRequest, ModerateReviewRequest, ReviewImageRequest,
        ReviewResponseRequest,
    },
    error::AppError,
    routes::params::{Pagination, ReviewListQuery},
    services::{admin_service, review_service},
};
use uuid::Uuid;

use support::{admin_auth, create_category, create_user, setup_state, user_auth};

fn review_request(category_id: Option<Uuid>, rating: i32) -> CreateReviewRequest {
    CreateReviewRequest {
        title: "Meu cão adorou".into(),
        content: "Comeu tudo em minutos, pelagem visivelmente melhor.".into(),
        rating,
        category_id,
        product_name: "Ração Premium 15kg".into(),
        pros: "Cheiro bom".into(),
        cons: "Embalagem sem zíper".into(),
        would_recommend: true,
    }
}

#[tokio::test]
async fn reviews_start_pending_and_surface_after_moderation() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let author_id = create_user(&state, "reviewer@example.com", false).await?;
    let admin_id = create_user(&state, "moderator@example.com", true).await?;
    let auth_author = user_auth(author_id);
    let auth_admin = admin_auth(admin_id);
    let category_id = create_category(&state, "Petiscos").await?;

    for bad_rating in [0, 6] {
        let rejected = review_service::create_review(
            &state,
            &auth_author,
            review_request(Some(category_id), bad_rating),
        )
        .await;
        assert!(matches!(rejected, Err(AppError::BadRequest(_))));
    }

    let detail = review_service::create_review(
        &state,
        &auth_author,
        review_request(Some(category_id), 3),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(detail.review.status, "pending");
    assert_eq!(detail.stars, "★★★☆☆");

    // Pending reviews never appear in the public listing.
    let query = ReviewListQuery {
        pagination: Pagination {
            page: Some(1),
            per_page: Some(100),
        },
        category_id: Some(category_id),
        rating: None,
        sort_order: None,
    };
    let listed = review_service::list_reviews(&state, query).await?.data.unwrap();
    assert!(listed.items.is_empty());

    let moderated = admin_service::moderate_review(
        &state,
        &auth_admin,
        detail.review.id,
        ModerateReviewRequest {
            status: "approved".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(moderated.review.status, "approved");
    assert!(moderated.review.reviewed_at.is_some());

    let query = ReviewListQuery {
        pagination: Pagination {
            page: Some(1),
            per_page: Some(100),
        },
        category_id: Some(category_id),
        rating: None,
        sort_order: None,
    };
    let listed = review_service::list_reviews(&state, query).await?.data.unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].review.id, detail.review.id);

    // Moderation is admin-only.
    let refused = admin_service::moderate_review(
        &state,
        &auth_author,
        detail.review.id,
        ModerateReviewRequest {
            status: "rejected".into(),
        },
    )
    .await;
    assert!(matches!(refused, Err(AppError::Forbidden)));

    Ok(())
}

#[tokio::test]
async fn each_user_votes_at_most_once_per_review() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let author_id = create_user(&state, "voted-author@example.com", false).await?;
    let voter_a = create_user(&state, "voter-a@example.com", false).await?;
    let voter_b = create_user(&state, "voter-b@example.com", false).await?;

    let detail = review_service::create_review(
        &state,
        &user_auth(author_id),
        review_request(None, 5),
    )
    .await?
    .data
    .unwrap();
    let review_id = detail.review.id;

    let bad_type = review_service::cast_vote(
        &state,
        &user_auth(voter_a),
        review_id,
        CastVoteRequest {
            vote_type: "meh".into(),
        },
    )
    .await;
    assert!(matches!(bad_type, Err(AppError::BadRequest(_))));

    let vote = review_service::cast_vote(
        &state,
        &user_auth(voter_a),
        review_id,
        CastVoteRequest {
            vote_type: "helpful".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(vote.vote.vote_type, "helpful");

    // Same voter again, even with the opposite vote, is rejected.
    let dup = review_service::cast_vote(
        &state,
        &user_auth(voter_a),
        review_id,
        CastVoteRequest {
            vote_type: "not_helpful".into(),
        },
    )
    .await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));

    let second = review_service::cast_vote(
        &state,
        &user_auth(voter_b),
        review_id,
        CastVoteRequest {
            vote_type: "not_helpful".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(second.vote.vote_type, "not_helpful");

    Ok(())
}

#[tokio::test]
async fn single_response_counters_and_author_only_images() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let author_id = create_user(&state, "img-author@example.com", false).await?;
    let other_id = create_user(&state, "img-other@example.com", false).await?;
    let admin_id = create_user(&state, "responder@example.com", true).await?;
    let auth_author = user_auth(author_id);
    let auth_admin = admin_auth(admin_id);

    let detail = review_service::create_review(&state, &auth_author, review_request(None, 4))
        .await?
        .data
        .unwrap();
    let review_id = detail.review.id;

    review_service::record_response(
        &state,
        &auth_admin,
        review_id,
        ReviewResponseRequest {
            content: "Obrigado pelo retorno!".into(),
        },
    )
    .await?;

    let again = review_service::record_response(
        &state,
        &auth_admin,
        review_id,
        ReviewResponseRequest {
            content: "Segunda resposta".into(),
        },
    )
    .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let after = review_service::increment_helpful(&state, review_id).await?.data.unwrap();
    assert_eq!(after.review.helpful_count, 1);
    let after = review_service::increment_helpful(&state, review_id).await?.data.unwrap();
    assert_eq!(after.review.helpful_count, 2);

    let after = review_service::increment_views(&state, review_id).await?.data.unwrap();
    assert_eq!(after.review.views_count, 1);
    assert_eq!(after.review.helpful_count, 2);

    let missing = review_service::increment_views(&state, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    // Only the author attaches images.
    let refused = review_service::attach_image(
        &state,
        &user_auth(other_id),
        review_id,
        ReviewImageRequest {
            image: "uploads/sacola.jpg".into(),
            caption: String::new(),
        },
    )
    .await;
    assert!(matches!(refused, Err(AppError::Forbidden)));

    review_service::attach_image(
        &state,
        &auth_author,
        review_id,
        ReviewImageRequest {
            image: "uploads/sacola.jpg".into(),
            caption: "Embalagem na entrega".into(),
        },
    )
    .await?;

    let images = review_service::list_images(&state, review_id).await?.data.unwrap();
    assert_eq!(images.items.len(), 1);
    assert_eq!(images.items[0].caption, "Embalagem na entrega");

    Ok(())
}
