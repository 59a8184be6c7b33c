use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alliance {
    pub id: Uuid,
    pub name: String,
    pub tag: String,
    points: u64,
    attack_points: u64,
    defense_points: u64,
}

impl Alliance {
    pub fn new(name: String, tag: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            tag,
            points: 0,
            attack_points: 0,
            defense_points: 0,
        }
    }

    /// Constructor for re-hydrating an Alliance from persistence.
    pub fn from_persistence(
        id: Uuid,
        name: String,
        tag: String,
        points: u64,
        attack_points: u64,
        defense_points: u64,
    ) -> Self {
        Self {
            id,
            name,
            tag,
            points,
            attack_points,
            defense_points,
        }
    }

    pub fn attack_points(&self) -> u64 {
        self.attack_points
    }

    pub fn defense_points(&self) -> u64 {
        self.defense_points
    }

    /// Sum of the members' ranking points. Membership changes and point
    /// awards keep it current.
    pub fn points(&self) -> u64 {
        self.points
    }

    /// Counts a joining member's score into the total.
    pub fn add_member_points(&mut self, points: u64) {
        self.points += points;
    }

    /// Removes a leaving member's score from the total.
    pub fn remove_member_points(&mut self, points: u64) {
        self.points = self.points.saturating_sub(points);
    }

    /// Credited when a member attacks during an active war.
    pub fn award_attack_points(&mut self, points: u64) {
        self.attack_points += points;
    }

    /// Credited when a member defends during an active war.
    pub fn award_defense_points(&mut self, points: u64) {
        self.defense_points += points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_points_track_joins_and_leaves() {
        let mut alliance = Alliance::new("Res Publica".to_string(), "SPQR".to_string());
        alliance.add_member_points(120);
        alliance.add_member_points(30);
        assert_eq!(alliance.points(), 150);

        alliance.remove_member_points(30);
        assert_eq!(alliance.points(), 120);

        // a stale total never underflows
        alliance.remove_member_points(999);
        assert_eq!(alliance.points(), 0);
    }

    #[test]
    fn test_war_points_accumulate_separately() {
        let mut alliance = Alliance::new("Res Publica".to_string(), "SPQR".to_string());
        alliance.award_attack_points(70);
        alliance.award_defense_points(40);

        assert_eq!(alliance.attack_points(), 70);
        assert_eq!(alliance.defense_points(), 40);
        assert_eq!(alliance.points(), 0, "war credit is not the member total");
    }
}
