use crate::db::LearnerProfile;

pub const MAX_GOALS: usize = 6;
pub const MIN_WEEKLY_HOURS: u32 = 1;
pub const MAX_WEEKLY_HOURS: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("goals must list between 1 and 6 entries, got {0}")]
    GoalCount(usize),
    #[error("goals must not be blank")]
    BlankGoal,
    #[error("weeklyTimeCommitmentH must be between 1 and 40, got {0}")]
    WeeklyHours(u32),
}

/// Checks onboarding answers and builds the stored profile. Goals are trimmed.
pub fn validate_profile(
    user_id: &str,
    goals: Vec<String>,
    weekly_time_commitment_h: u32,
) -> Result<LearnerProfile, ProfileError> {
    if goals.is_empty() || goals.len() > MAX_GOALS {
        return Err(ProfileError::GoalCount(goals.len()));
    }
    // an empty goal would overlap with every tag
    let goals: Vec<String> = goals.into_iter().map(|g| g.trim().to_string()).collect();
    if goals.iter().any(|g| g.is_empty()) {
        return Err(ProfileError::BlankGoal);
    }
    if !(MIN_WEEKLY_HOURS..=MAX_WEEKLY_HOURS).contains(&weekly_time_commitment_h) {
        return Err(ProfileError::WeeklyHours(weekly_time_commitment_h));
    }

    Ok(LearnerProfile {
        user_id: user_id.to_string(),
        goals,
        weekly_time_commitment_h: Some(weekly_time_commitment_h),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goals(items: &[&str]) -> Vec<String> {
        items.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn test_valid_profile_trims_goals() {
        let profile = validate_profile("u1", goals(&[" Build websites "]), 5).unwrap();
        assert_eq!(profile.goals, vec!["Build websites".to_string()]);
        assert_eq!(profile.weekly_time_commitment_h, Some(5));
    }

    #[test]
    fn test_goal_count_bounds() {
        assert_eq!(validate_profile("u1", Vec::new(), 5), Err(ProfileError::GoalCount(0)));
        let seven = goals(&["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(validate_profile("u1", seven, 5), Err(ProfileError::GoalCount(7)));
        let six = goals(&["a", "b", "c", "d", "e", "f"]);
        assert!(validate_profile("u1", six, 5).is_ok());
    }

    #[test]
    fn test_blank_goal_rejected() {
        assert_eq!(
            validate_profile("u1", goals(&["css", "  "]), 5),
            Err(ProfileError::BlankGoal)
        );
    }

    #[test]
    fn test_weekly_hours_bounds() {
        assert_eq!(validate_profile("u1", goals(&["css"]), 0), Err(ProfileError::WeeklyHours(0)));
        assert_eq!(validate_profile("u1", goals(&["css"]), 41), Err(ProfileError::WeeklyHours(41)));
        assert!(validate_profile("u1", goals(&["css"]), 1).is_ok());
        assert!(validate_profile("u1", goals(&["css"]), 40).is_ok());
    }
}
