// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Demo data generation.
//!
//! The shape of the data is fixed (two teams of six heroes each, a workout
//! catalog of eight entries); activity values are random. Generation is split
//! from storage so the plan can be inspected without a database.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::db::EntityStore;
use crate::error::Result;
use crate::models::activity::{ACTIVITY_TYPES, DISTANCE_ACTIVITY_TYPES};
use crate::models::{
    Activity, Difficulty, Team, TeamPayload, User, UserPayload, Workout, WorkoutPayload,
};
use crate::services::ranking::recompute_leaderboard;
use crate::time_utils::days_before;

/// Inclusive range of activities generated per user.
pub const ACTIVITIES_PER_USER: (usize, usize) = (5, 15);

struct Roster {
    team: &'static str,
    description: &'static str,
    /// (name, email, password)
    members: [(&'static str, &'static str, &'static str); 6],
}

const ROSTERS: [Roster; 2] = [
    Roster {
        team: "Team Marvel",
        description: "Earth's Mightiest Heroes",
        members: [
            ("Tony Stark", "ironman@marvel.com", "stark123"),
            ("Steve Rogers", "captainamerica@marvel.com", "rogers123"),
            ("Thor Odinson", "thor@marvel.com", "thor123"),
            ("Natasha Romanoff", "blackwidow@marvel.com", "natasha123"),
            ("Bruce Banner", "hulk@marvel.com", "banner123"),
            ("Peter Parker", "spiderman@marvel.com", "parker123"),
        ],
    },
    Roster {
        team: "Team DC",
        description: "Justice League Members",
        members: [
            ("Clark Kent", "superman@dc.com", "kent123"),
            ("Bruce Wayne", "batman@dc.com", "wayne123"),
            ("Diana Prince", "wonderwoman@dc.com", "diana123"),
            ("Barry Allen", "flash@dc.com", "barry123"),
            ("Arthur Curry", "aquaman@dc.com", "arthur123"),
            ("Hal Jordan", "greenlantern@dc.com", "hal123"),
        ],
    },
];

/// (name, description, difficulty, duration, calories_estimate, category)
type CatalogRow = (&'static str, &'static str, Difficulty, u32, u32, &'static str);

const WORKOUT_CATALOG: [CatalogRow; 8] = [
    (
        "Super Soldier Strength",
        "High-intensity strength training inspired by Captain America",
        Difficulty::Hard,
        60,
        600,
        "Strength",
    ),
    (
        "Web-Slinger Cardio",
        "Fast-paced cardio workout like Spider-Man swinging through the city",
        Difficulty::Medium,
        45,
        450,
        "Cardio",
    ),
    (
        "Amazon Warrior Training",
        "Combat-focused workout inspired by Wonder Woman",
        Difficulty::Hard,
        75,
        700,
        "Combat",
    ),
    (
        "Flash Speed Circuit",
        "High-speed interval training for maximum calorie burn",
        Difficulty::Hard,
        30,
        500,
        "HIIT",
    ),
    (
        "Zen Master Meditation",
        "Mindfulness and flexibility workout",
        Difficulty::Easy,
        30,
        150,
        "Yoga",
    ),
    (
        "Dark Knight Endurance",
        "Batman-inspired endurance and stamina training",
        Difficulty::Medium,
        60,
        550,
        "Endurance",
    ),
    (
        "Asgardian Power Lift",
        "Thor-inspired heavy lifting and power training",
        Difficulty::Hard,
        50,
        600,
        "Powerlifting",
    ),
    (
        "Atlantean Swimming",
        "Aquaman-inspired swimming workout for full-body conditioning",
        Difficulty::Medium,
        45,
        400,
        "Swimming",
    ),
];

/// A user waiting to be stored, with the index of its team in the plan.
#[derive(Debug, Clone)]
pub struct PlannedUser {
    pub team: usize,
    pub user: User,
}

/// An activity waiting to be stored, with the index of its user in the plan.
#[derive(Debug, Clone)]
pub struct PlannedActivity {
    pub user: usize,
    pub activity: Activity,
}

/// Everything the seed run will write, before IDs exist.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub teams: Vec<Team>,
    pub users: Vec<PlannedUser>,
    pub activities: Vec<PlannedActivity>,
    pub workouts: Vec<Workout>,
}

/// Counts of what a seed run stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub teams: usize,
    pub users: usize,
    pub activities: usize,
    pub leaderboard_entries: usize,
    pub workouts: usize,
}

impl SeedPlan {
    /// Generate a plan with activity dates in the 30 days before `now`.
    pub fn generate(rng: &mut impl Rng, now: DateTime<Utc>) -> Self {
        let mut teams = Vec::new();
        let mut users = Vec::new();

        for (team_index, roster) in ROSTERS.iter().enumerate() {
            teams.push(Team::new(TeamPayload {
                name: roster.team.to_string(),
                description: Some(roster.description.to_string()),
            }));

            for (name, email, password) in roster.members {
                users.push(PlannedUser {
                    team: team_index,
                    user: User::new(UserPayload {
                        name: name.to_string(),
                        email: email.to_string(),
                        password: password.to_string(),
                        team_id: None,
                    }),
                });
            }
        }

        let mut activities = Vec::new();
        for (user_index, planned) in users.iter().enumerate() {
            let (min, max) = ACTIVITIES_PER_USER;
            let count = rng.gen_range(min..=max);
            for _ in 0..count {
                activities.push(PlannedActivity {
                    user: user_index,
                    activity: random_activity(rng, &planned.user.name, now),
                });
            }
        }

        Self {
            teams,
            users,
            activities,
            workouts: workout_catalog(),
        }
    }
}

fn random_activity(rng: &mut impl Rng, user_name: &str, now: DateTime<Utc>) -> Activity {
    let activity_type = ACTIVITY_TYPES[rng.gen_range(0..ACTIVITY_TYPES.len())];
    let duration: u32 = rng.gen_range(20..=120);
    let distance = DISTANCE_ACTIVITY_TYPES
        .contains(&activity_type)
        .then(|| (rng.gen_range(1.0..=20.0_f64) * 100.0).round() / 100.0);
    let calories = duration * rng.gen_range(5..=10);
    let date = days_before(now, rng.gen_range(1..=30));

    Activity {
        id: String::new(),
        user_id: String::new(),
        activity_type: activity_type.to_string(),
        duration,
        distance,
        calories,
        date,
        notes: Some(format!("{} session by {}", activity_type, user_name)),
    }
}

/// The fixed workout suggestions.
pub fn workout_catalog() -> Vec<Workout> {
    WORKOUT_CATALOG
        .iter()
        .map(
            |&(name, description, difficulty, duration, calories_estimate, category)| {
                Workout::new(WorkoutPayload {
                    name: name.to_string(),
                    description: description.to_string(),
                    difficulty,
                    duration,
                    calories_estimate,
                    category: category.to_string(),
                })
            },
        )
        .collect()
}

/// Wipe the store and write `plan`, ranking the leaderboard along the way.
pub async fn seed_database(db: &dyn EntityStore, plan: SeedPlan) -> Result<SeedSummary> {
    tracing::info!("Clearing existing data");
    db.clear_all().await?;

    tracing::info!(count = plan.teams.len(), "Creating teams");
    let mut team_ids = Vec::with_capacity(plan.teams.len());
    for team in plan.teams {
        team_ids.push(db.insert_team(team).await?.id);
    }

    tracing::info!(count = plan.users.len(), "Creating users");
    let mut user_ids = Vec::with_capacity(plan.users.len());
    for PlannedUser { team, mut user } in plan.users {
        user.team_id = team_ids.get(team).cloned();
        user_ids.push(db.insert_user(user).await?.id);
    }

    tracing::info!(count = plan.activities.len(), "Creating activities");
    let mut activity_count = 0;
    for PlannedActivity { user, mut activity } in plan.activities {
        if let Some(user_id) = user_ids.get(user) {
            activity.user_id = user_id.clone();
            db.insert_activity(activity).await?;
            activity_count += 1;
        }
    }

    let entries = recompute_leaderboard(db).await?;

    tracing::info!(count = plan.workouts.len(), "Creating workout suggestions");
    let mut workout_count = 0;
    for workout in plan.workouts {
        db.insert_workout(workout).await?;
        workout_count += 1;
    }

    let summary = SeedSummary {
        teams: team_ids.len(),
        users: user_ids.len(),
        activities: activity_count,
        leaderboard_entries: entries.len(),
        workouts: workout_count,
    };
    tracing::info!(?summary, "Database populated");
    Ok(summary)
}
