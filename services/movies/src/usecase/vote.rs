use chrono::Utc;

use cinema_domain::vote::{VoteAction, VoteDirection};

use crate::domain::repository::{PetitionRepository, VoteRepository};
use crate::domain::types::Actor;
use crate::error::MoviesServiceError;

/// Flash text describing an applied vote action.
pub fn vote_message(action: VoteAction) -> String {
    match action {
        VoteAction::Cast(direction) => format!("You have {direction}voted for this petition."),
        VoteAction::Switch(direction) => format!("Your vote has been changed to {direction}vote."),
        VoteAction::Retract => "Your vote has been removed.".to_owned(),
    }
}

// ── CastVote ─────────────────────────────────────────────────────────────────

pub struct CastVoteUseCase<P: PetitionRepository, V: VoteRepository> {
    pub petitions: P,
    pub votes: V,
}

impl<P: PetitionRepository, V: VoteRepository> CastVoteUseCase<P, V> {
    /// Apply a vote to an active petition and return what happened to the
    /// caller's vote row.
    pub async fn execute(
        &self,
        actor: Actor,
        petition_id: i32,
        raw_vote_type: &str,
    ) -> Result<VoteAction, MoviesServiceError> {
        if self.petitions.find_active(petition_id).await?.is_none() {
            return Err(MoviesServiceError::PetitionNotFound);
        }
        let cast = raw_vote_type
            .parse::<VoteDirection>()
            .map_err(|_| MoviesServiceError::InvalidVoteType)?;

        let current = self.votes.find(petition_id, actor.user_id).await?;
        let action = VoteDirection::transition(current, cast);
        match action {
            VoteAction::Cast(direction) => {
                self.votes
                    .insert(petition_id, actor.user_id, direction, Utc::now())
                    .await?
            }
            VoteAction::Switch(direction) => {
                self.votes
                    .update_direction(petition_id, actor.user_id, direction)
                    .await?
            }
            VoteAction::Retract => self.votes.delete(petition_id, actor.user_id).await?,
        }
        tracing::debug!(petition_id, user_id = %actor.user_id, ?action, "vote applied");
        Ok(action)
    }
}
