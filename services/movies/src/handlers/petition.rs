use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinema_auth_types::identity::IdentityHeaders;
use cinema_core::flash::FlashMessage;
use cinema_domain::vote::{VoteAction, VoteDirection};

use crate::domain::types::{Petition, PetitionSummary};
use crate::error::MoviesServiceError;
use crate::handlers::{
    PETITIONS_PATH, PageResponse, RedirectResponse, done, page, petition_path, recover,
};
use crate::state::AppState;
use crate::usecase::petition::{
    CreatePetitionInput, CreatePetitionUseCase, DeletePetitionUseCase,
    GetPetitionForDeleteUseCase, GetPetitionUseCase, ListPetitionsUseCase,
};
use crate::usecase::vote::{CastVoteUseCase, vote_message};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PetitionResponse {
    pub id: i32,
    pub movie_title: String,
    pub description: String,
    pub reason: String,
    pub created_by: Uuid,
    pub created_by_username: String,
    #[serde(serialize_with = "cinema_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Petition> for PetitionResponse {
    fn from(p: Petition) -> Self {
        Self {
            id: p.id,
            movie_title: p.movie_title,
            description: p.description,
            reason: p.reason,
            created_by: p.created_by,
            created_by_username: p.created_by_username,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PetitionSummaryResponse {
    #[serde(flatten)]
    pub petition: PetitionResponse,
    pub upvotes: u64,
    pub downvotes: u64,
    pub total_votes: u64,
    pub net_score: i64,
}

impl From<PetitionSummary> for PetitionSummaryResponse {
    fn from(summary: PetitionSummary) -> Self {
        Self {
            upvotes: summary.votes.up,
            downvotes: summary.votes.down,
            total_votes: summary.votes.total(),
            net_score: summary.net_score(),
            petition: summary.petition.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PetitionListContext {
    pub petitions: Vec<PetitionSummaryResponse>,
}

#[derive(Debug, Serialize)]
pub struct PetitionDetailContext {
    pub petition: PetitionSummaryResponse,
    pub user_vote: Option<VoteDirection>,
}

#[derive(Debug, Serialize)]
pub struct PetitionFormContext {
    pub fields: [&'static str; 3],
}

#[derive(Debug, Serialize)]
pub struct DeletePetitionContext {
    pub petition: PetitionResponse,
}

// ── Forms ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct PetitionForm {
    #[serde(default)]
    pub movie_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct VoteForm {
    #[serde(default)]
    pub vote_type: String,
}

// ── GET /movies/petitions ────────────────────────────────────────────────────

pub async fn list_petitions(
    jar: CookieJar,
    State(state): State<AppState>,
) -> Result<PageResponse<PetitionListContext>, MoviesServiceError> {
    let uc = ListPetitionsUseCase {
        petitions: state.petition_repo(),
        votes: state.vote_repo(),
    };
    let petitions = uc.execute().await?;
    Ok(page(
        jar,
        "Movie Petitions",
        PetitionListContext {
            petitions: petitions
                .into_iter()
                .map(PetitionSummaryResponse::from)
                .collect(),
        },
    ))
}

// ── GET /movies/petitions/create ─────────────────────────────────────────────

pub async fn petition_form(
    jar: CookieJar,
    _identity: IdentityHeaders,
) -> PageResponse<PetitionFormContext> {
    page(
        jar,
        "Create Movie Petition",
        PetitionFormContext {
            fields: ["movie_title", "description", "reason"],
        },
    )
}

// ── POST /movies/petitions/create ────────────────────────────────────────────

pub async fn create_petition(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Form(form): Form<PetitionForm>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = CreatePetitionUseCase {
        petitions: state.petition_repo(),
    };
    uc.execute(
        identity.into(),
        CreatePetitionInput {
            movie_title: form.movie_title,
            description: form.description,
            reason: form.reason,
        },
    )
    .await?;
    Ok(done(
        jar,
        Some(FlashMessage::success(
            "Your movie petition has been created successfully!",
        )),
        PETITIONS_PATH,
    ))
}

// ── GET /movies/petitions/{petition_id} ──────────────────────────────────────

pub async fn get_petition(
    jar: CookieJar,
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Path(petition_id): Path<i32>,
) -> Result<PageResponse<PetitionDetailContext>, MoviesServiceError> {
    let uc = GetPetitionUseCase {
        petitions: state.petition_repo(),
        votes: state.vote_repo(),
    };
    let detail = uc
        .execute(petition_id, identity.map(|i| i.user_id))
        .await?;
    let title = format!("Petition: {}", detail.summary.petition.movie_title);
    Ok(page(
        jar,
        title,
        PetitionDetailContext {
            petition: detail.summary.into(),
            user_vote: detail.user_vote,
        },
    ))
}

// ── POST /movies/petitions/{petition_id}/vote ────────────────────────────────

pub async fn cast_vote(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(petition_id): Path<i32>,
    Form(form): Form<VoteForm>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = CastVoteUseCase {
        petitions: state.petition_repo(),
        votes: state.vote_repo(),
    };
    let to = petition_path(petition_id);
    match uc
        .execute(identity.into(), petition_id, &form.vote_type)
        .await
    {
        Ok(action) => {
            let message = vote_message(action);
            let flash = match action {
                VoteAction::Retract => FlashMessage::info(message),
                VoteAction::Cast(_) | VoteAction::Switch(_) => FlashMessage::success(message),
            };
            Ok(done(jar, Some(flash), &to))
        }
        Err(e) => recover(jar, e, &to),
    }
}

// ── GET /movies/petitions/{petition_id}/delete ───────────────────────────────

pub async fn confirm_delete_petition(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(petition_id): Path<i32>,
) -> Result<Response, MoviesServiceError> {
    let uc = GetPetitionForDeleteUseCase {
        petitions: state.petition_repo(),
    };
    let response = match uc.execute(identity.into(), petition_id).await {
        Ok(petition) => page(
            jar,
            "Delete Petition",
            DeletePetitionContext {
                petition: petition.into(),
            },
        )
        .into_response(),
        Err(e) => recover(jar, e, &petition_path(petition_id))?.into_response(),
    };
    Ok(response)
}

// ── POST /movies/petitions/{petition_id}/delete ──────────────────────────────

pub async fn delete_petition(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(petition_id): Path<i32>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = DeletePetitionUseCase {
        petitions: state.petition_repo(),
    };
    match uc.execute(identity.into(), petition_id).await {
        Ok(()) => Ok(done(
            jar,
            Some(FlashMessage::success("Petition has been deleted.")),
            PETITIONS_PATH,
        )),
        Err(e) => recover(jar, e, &petition_path(petition_id)),
    }
}
