use chrono::Utc;
use uuid::Uuid;

use cinema_domain::form::validate_petition;
use cinema_domain::vote::VoteDirection;

use crate::domain::repository::{PetitionRepository, VoteRepository};
use crate::domain::types::{Actor, NewPetition, Petition, PetitionSummary};
use crate::error::MoviesServiceError;

/// Raw petition form values.
#[derive(Debug, Clone, Default)]
pub struct CreatePetitionInput {
    pub movie_title: String,
    pub description: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct PetitionDetail {
    pub summary: PetitionSummary,
    /// The caller's current vote, when signed in and voted.
    pub user_vote: Option<VoteDirection>,
}

fn can_delete(actor: Actor, petition: &Petition) -> bool {
    petition.created_by == actor.user_id || actor.is_staff()
}

// ── ListPetitions ────────────────────────────────────────────────────────────

pub struct ListPetitionsUseCase<P: PetitionRepository, V: VoteRepository> {
    pub petitions: P,
    pub votes: V,
}

impl<P: PetitionRepository, V: VoteRepository> ListPetitionsUseCase<P, V> {
    /// Active petitions, newest first, each with its vote tally.
    pub async fn execute(&self) -> Result<Vec<PetitionSummary>, MoviesServiceError> {
        let petitions = self.petitions.list_active().await?;
        let ids: Vec<i32> = petitions.iter().map(|p| p.id).collect();
        let counts = self.votes.counts(&ids).await?;
        Ok(petitions
            .into_iter()
            .map(|petition| PetitionSummary {
                votes: counts.get(&petition.id).copied().unwrap_or_default(),
                petition,
            })
            .collect())
    }
}

// ── GetPetition ──────────────────────────────────────────────────────────────

pub struct GetPetitionUseCase<P: PetitionRepository, V: VoteRepository> {
    pub petitions: P,
    pub votes: V,
}

impl<P: PetitionRepository, V: VoteRepository> GetPetitionUseCase<P, V> {
    pub async fn execute(
        &self,
        petition_id: i32,
        viewer: Option<Uuid>,
    ) -> Result<PetitionDetail, MoviesServiceError> {
        let petition = self
            .petitions
            .find_active(petition_id)
            .await?
            .ok_or(MoviesServiceError::PetitionNotFound)?;
        let votes = self
            .votes
            .counts(&[petition.id])
            .await?
            .remove(&petition.id)
            .unwrap_or_default();
        let user_vote = match viewer {
            Some(user_id) => self.votes.find(petition.id, user_id).await?,
            None => None,
        };
        Ok(PetitionDetail {
            summary: PetitionSummary { petition, votes },
            user_vote,
        })
    }
}

// ── CreatePetition ───────────────────────────────────────────────────────────

pub struct CreatePetitionUseCase<P: PetitionRepository> {
    pub petitions: P,
}

impl<P: PetitionRepository> CreatePetitionUseCase<P> {
    /// Returns the new petition id. Field errors are reported together as
    /// `InvalidForm`.
    pub async fn execute(
        &self,
        actor: Actor,
        input: CreatePetitionInput,
    ) -> Result<i32, MoviesServiceError> {
        let draft = validate_petition(&input.movie_title, &input.description, &input.reason)
            .map_err(MoviesServiceError::InvalidForm)?;
        let id = self
            .petitions
            .create(&NewPetition {
                movie_title: draft.movie_title,
                description: draft.description,
                reason: draft.reason,
                created_by: actor.user_id,
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(petition_id = id, user_id = %actor.user_id, "petition created");
        Ok(id)
    }
}

// ── GetPetitionForDelete ─────────────────────────────────────────────────────

pub struct GetPetitionForDeleteUseCase<P: PetitionRepository> {
    pub petitions: P,
}

impl<P: PetitionRepository> GetPetitionForDeleteUseCase<P> {
    pub async fn execute(
        &self,
        actor: Actor,
        petition_id: i32,
    ) -> Result<Petition, MoviesServiceError> {
        let petition = self
            .petitions
            .find_active(petition_id)
            .await?
            .ok_or(MoviesServiceError::PetitionNotFound)?;
        if !can_delete(actor, &petition) {
            return Err(MoviesServiceError::NotPetitionOwner);
        }
        Ok(petition)
    }
}

// ── DeletePetition ───────────────────────────────────────────────────────────

pub struct DeletePetitionUseCase<P: PetitionRepository> {
    pub petitions: P,
}

impl<P: PetitionRepository> DeletePetitionUseCase<P> {
    /// Soft-delete: the petition is marked inactive. Only its creator or a
    /// staff user may do this.
    pub async fn execute(&self, actor: Actor, petition_id: i32) -> Result<(), MoviesServiceError> {
        let petition = self
            .petitions
            .find_active(petition_id)
            .await?
            .ok_or(MoviesServiceError::PetitionNotFound)?;
        if !can_delete(actor, &petition) {
            tracing::debug!(petition_id, user_id = %actor.user_id, "petition delete refused");
            return Err(MoviesServiceError::NotPetitionOwner);
        }
        if !self.petitions.deactivate(petition.id).await? {
            // Deleted concurrently by someone else.
            return Err(MoviesServiceError::PetitionNotFound);
        }
        tracing::info!(petition_id, user_id = %actor.user_id, "petition deactivated");
        Ok(())
    }
}
