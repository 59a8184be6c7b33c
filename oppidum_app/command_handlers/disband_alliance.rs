use tracing::{info, instrument};

use oppidum_types::errors::{ApplicationError, GameError};

use crate::{
    cqrs::{CommandHandler, HandlerContext, commands::DisbandAlliance},
    uow::UnitOfWork,
};

pub struct DisbandAllianceCommandHandler {}

impl Default for DisbandAllianceCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DisbandAllianceCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

/// Dissolves an alliance. Wars it is still part of are force-ended before
/// the members are released, so no war ever points at a missing alliance.
#[async_trait::async_trait]
impl CommandHandler<DisbandAlliance> for DisbandAllianceCommandHandler {
    #[instrument(skip_all, fields(alliance_id = %command.alliance_id))]
    async fn handle(
        &self,
        command: DisbandAlliance,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<(), ApplicationError> {
        let player_repo = uow.players();
        let alliance_repo = uow.alliances();
        let war_repo = uow.wars();
        let now = ctx.clock.now();

        let alliance = alliance_repo.get_by_id(command.alliance_id).await?;

        let requester = player_repo.get_by_id(command.player_id).await?;
        if requester.alliance_id() != Some(alliance.id) {
            return Err(GameError::NotAllianceMember {
                player_id: command.player_id,
                alliance_id: command.alliance_id,
            }
            .into());
        }

        for mut war in war_repo.list_by_alliance_id(alliance.id).await? {
            if !war.status().is_ended() {
                war.end(now)?;
                war_repo.save(&war).await?;
                info!(war_id = %war.id, "War force-ended by disband");
            }
        }

        for mut member in player_repo.list_by_alliance_id(alliance.id).await? {
            member.leave_alliance()?;
            player_repo.save(&member).await?;
        }

        alliance_repo.delete(alliance.id).await?;

        info!("Alliance disbanded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use oppidum_game::test_utils::{
        AllianceFactoryOptions, PlayerFactoryOptions, WarFactoryOptions, alliance_factory,
        player_factory, war_factory,
    };
    use oppidum_types::{
        diplomacy::WarStatus,
        errors::{GameError, Result},
    };

    use super::*;
    use crate::test_utils::tests::{ManualClock, MockUnitOfWork, handler_context_with_clock};

    #[tokio::test]
    async fn test_disband_alliance_handler_releases_members_and_ends_wars() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let now = Utc::now();
        let ctx = handler_context_with_clock(ManualClock::at(now));

        let doomed = alliance_factory(AllianceFactoryOptions::default());
        let rival = alliance_factory(AllianceFactoryOptions::default());
        let active_war = war_factory(WarFactoryOptions {
            attacker_alliance_id: Some(doomed.id),
            defender_alliance_id: Some(rival.id),
            accepted: Some(true),
            ..Default::default()
        });

        let founder = player_factory(PlayerFactoryOptions {
            alliance_id: Some(doomed.id),
            ..Default::default()
        });
        let member = player_factory(PlayerFactoryOptions {
            alliance_id: Some(doomed.id),
            ..Default::default()
        });

        mock_uow.alliances().add(&doomed).await?;
        mock_uow.alliances().add(&rival).await?;
        mock_uow.wars().add(&active_war).await?;
        mock_uow.players().save(&founder).await?;
        mock_uow.players().save(&member).await?;

        DisbandAllianceCommandHandler::new()
            .handle(
                DisbandAlliance {
                    player_id: founder.id,
                    alliance_id: doomed.id,
                },
                &mock_uow,
                &ctx,
            )
            .await?;

        let ended = mock_uow.wars().get_by_id(active_war.id).await?;
        assert_eq!(ended.status(), WarStatus::Ended);
        assert_eq!(ended.ended_at(), Some(now));

        for player_id in [founder.id, member.id] {
            let released = mock_uow.players().get_by_id(player_id).await?;
            assert_eq!(released.alliance_id(), None);
        }

        let gone = mock_uow.alliances().get_by_id(doomed.id).await;
        assert!(gone.is_err(), "the alliance row is deleted");

        // the rival alliance is untouched
        mock_uow.alliances().get_by_id(rival.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_disband_alliance_handler_ends_proposed_wars_too() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context_with_clock(ManualClock::at(Utc::now()));

        let doomed = alliance_factory(AllianceFactoryOptions::default());
        let rival = alliance_factory(AllianceFactoryOptions::default());
        let proposal = war_factory(WarFactoryOptions {
            attacker_alliance_id: Some(rival.id),
            defender_alliance_id: Some(doomed.id),
            accepted: Some(false),
            ..Default::default()
        });
        let founder = player_factory(PlayerFactoryOptions {
            alliance_id: Some(doomed.id),
            ..Default::default()
        });

        mock_uow.alliances().add(&doomed).await?;
        mock_uow.alliances().add(&rival).await?;
        mock_uow.wars().add(&proposal).await?;
        mock_uow.players().save(&founder).await?;

        DisbandAllianceCommandHandler::new()
            .handle(
                DisbandAlliance {
                    player_id: founder.id,
                    alliance_id: doomed.id,
                },
                &mock_uow,
                &ctx,
            )
            .await?;

        let refused = mock_uow.wars().get_by_id(proposal.id).await?;
        assert_eq!(refused.status(), WarStatus::Ended);
        assert_eq!(refused.started_at(), None, "it never went active");
        Ok(())
    }

    #[tokio::test]
    async fn test_disband_alliance_handler_rejects_outsiders() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context_with_clock(ManualClock::at(Utc::now()));

        let alliance = alliance_factory(AllianceFactoryOptions::default());
        let outsider = player_factory(PlayerFactoryOptions::default());
        mock_uow.alliances().add(&alliance).await?;
        mock_uow.players().save(&outsider).await?;

        let result = DisbandAllianceCommandHandler::new()
            .handle(
                DisbandAlliance {
                    player_id: outsider.id,
                    alliance_id: alliance.id,
                },
                &mock_uow,
                &ctx,
            )
            .await;

        assert!(result.is_err(), "Expected handler to fail");
        assert_eq!(
            result.err().unwrap().to_string(),
            GameError::NotAllianceMember {
                player_id: outsider.id,
                alliance_id: alliance.id,
            }
            .to_string()
        );

        mock_uow.alliances().get_by_id(alliance.id).await?;
        Ok(())
    }
}
