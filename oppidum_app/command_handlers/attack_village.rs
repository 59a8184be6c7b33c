use tracing::{info, instrument};

use oppidum_game::{
    combat,
    models::battle::{Battle, BattleSides},
};
use oppidum_types::{
    battle::BattleResult,
    common::ResourceBundle,
    errors::{ApplicationError, GameError},
};

use crate::{
    completion::settle_due_entries,
    cqrs::{CommandHandler, HandlerContext, commands::AttackVillage},
    events::DomainEvent,
    uow::UnitOfWork,
};

pub struct AttackVillageCommandHandler {}

impl Default for AttackVillageCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackVillageCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

/// Resolves an attack in one shot: both ledgers are settled to `now`,
/// the battle is fought, losses and loot are applied, and an immutable
/// battle record is written. When the two players' alliances have an
/// active war, the battle is credited to it.
#[async_trait::async_trait]
impl CommandHandler<AttackVillage> for AttackVillageCommandHandler {
    #[instrument(skip_all, fields(
        village_id = %command.village_id,
        target_village_id = %command.target_village_id,
    ))]
    async fn handle(
        &self,
        command: AttackVillage,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<Battle, ApplicationError> {
        let village_repo = uow.villages();
        let player_repo = uow.players();
        let config = &ctx.config.game;
        let now = ctx.clock.now();

        if command.village_id == command.target_village_id {
            return Err(GameError::SelfAttackRejected.into());
        }

        let mut attacker_village = village_repo.get_by_id(command.village_id).await?;
        if attacker_village.player_id != command.player_id {
            return Err(GameError::VillageNotOwned {
                village_id: command.village_id,
                player_id: command.player_id,
            }
            .into());
        }

        let mut defender_village = village_repo.get_by_id(command.target_village_id).await?;
        if defender_village.player_id == command.player_id {
            return Err(GameError::SelfAttackRejected.into());
        }

        // Both sides catch up on pending completions before any unit or
        // resource moves. A due training batch still joins the defense.
        settle_due_entries(uow, &mut attacker_village, now, ctx).await?;
        settle_due_entries(uow, &mut defender_village, now, ctx).await?;

        let attacking_force = attacker_village.army().deploy(&command.units)?;
        let defender_units = *defender_village.army().units();

        let outcome = combat::resolve(&attacking_force, defender_village.army(), config);
        let attacker_kills: u32 = outcome.defender_losses.iter().sum();
        let defender_kills: u32 = outcome.attacker_losses.iter().sum();

        attacker_village.apply_combat_losses(&outcome.attacker_losses, config);
        defender_village.apply_combat_losses(&outcome.defender_losses, config);

        let loot = if outcome.result == BattleResult::Victory {
            let mut survivors = attacking_force.clone();
            survivors.apply_losses(&outcome.attacker_losses);

            let picked = combat::plunder(
                &defender_village.balance(),
                config.combat.loot_fraction,
                survivors.carry_capacity(config),
            );
            // Never take more than the defender actually holds.
            let loot = picked.clamped_to(&defender_village.balance());
            defender_village.debit(&loot)?;
            attacker_village.credit(&loot);
            loot
        } else {
            ResourceBundle::ZERO
        };

        let mut attacker_player = player_repo.get_by_id(command.player_id).await?;
        let mut defender_player = player_repo.get_by_id(defender_village.player_id).await?;

        // War credit needs an *active* war between the two alliances. The
        // battle roles decide who gets attack and who gets defense points,
        // regardless of which alliance declared.
        let mut war_id = None;
        if let (Some(attacker_alliance_id), Some(defender_alliance_id)) =
            (attacker_player.alliance_id(), defender_player.alliance_id())
        {
            let war = uow
                .wars()
                .find_active_between(attacker_alliance_id, defender_alliance_id)
                .await?;
            if let Some(war) = war {
                war_id = Some(war.id);

                let alliance_repo = uow.alliances();
                let mut attacker_alliance =
                    alliance_repo.get_by_id(attacker_alliance_id).await?;
                let mut defender_alliance =
                    alliance_repo.get_by_id(defender_alliance_id).await?;
                attacker_alliance.award_attack_points(attacker_kills as u64);
                defender_alliance.award_defense_points(defender_kills as u64);
                alliance_repo.save(&attacker_alliance).await?;
                alliance_repo.save(&defender_alliance).await?;
            }
        }

        // The winner's ranking grows by the units they destroyed; their
        // alliance member total follows the player's score.
        let winner_award = match outcome.result {
            BattleResult::Victory => Some((&mut attacker_player, attacker_kills as u64)),
            BattleResult::Defeat => Some((&mut defender_player, defender_kills as u64)),
            BattleResult::Draw => None,
        };
        if let Some((winner, points)) = winner_award {
            winner.award_points(points);
            if let Some(alliance_id) = winner.alliance_id() {
                let alliance_repo = uow.alliances();
                let mut alliance = alliance_repo.get_by_id(alliance_id).await?;
                alliance.add_member_points(points);
                alliance_repo.save(&alliance).await?;
            }
            player_repo.save(winner).await?;
        }

        let battle = Battle::new(
            BattleSides {
                attacker_player_id: command.player_id,
                attacker_village_id: attacker_village.id,
                defender_player_id: defender_village.player_id,
                defender_village_id: defender_village.id,
                attacker_units: command.units,
                defender_units,
            },
            &outcome,
            loot,
            war_id,
            now,
        );

        uow.battles().add(&battle).await?;
        village_repo.save(&attacker_village).await?;
        village_repo.save(&defender_village).await?;

        ctx.events.publish(DomainEvent::BattleResolved {
            battle_id: battle.id,
            attacker_village_id: battle.attacker_village_id,
            defender_village_id: battle.defender_village_id,
            result: battle.result,
        });

        info!(
            battle_id = %battle.id,
            result = %battle.result,
            loot = battle.loot.total(),
            war = war_id.is_some(),
            "Battle resolved"
        );

        Ok(battle)
    }
}
