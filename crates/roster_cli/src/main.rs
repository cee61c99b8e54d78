//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `roster_core` wiring against a throwaway in-memory database.
//! - Print deterministic output for quick local sanity checks.

use roster_core::db::open_db_in_memory;
use roster_core::query::{ExprOps, Select, MEMBER, TEAM};
use roster_core::{DataAccessEngine, Member, MemberSearchService, SqliteMemberRepository, Team};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("roster_core version={}", roster_core::core_version());

    let conn = open_db_in_memory()?;
    let repo = SqliteMemberRepository::try_new(&conn)?;

    let team_a = Team::new("teamA");
    let team_b = Team::new("teamB");
    repo.persist_team(&team_a)?;
    repo.persist_team(&team_b)?;
    for (name, age, team) in [
        ("member1", 10, &team_a),
        ("member2", 20, &team_a),
        ("member3", 30, &team_b),
        ("member4", 40, &team_b),
    ] {
        repo.persist_member(&Member::new(Some(name), age, Some(team)))?;
    }

    let averages = Select::select([TEAM.name().expr(), MEMBER.age().avg()])
        .from(MEMBER)
        .join(MEMBER.team(), TEAM)
        .group_by(TEAM.name())
        .order_by([TEAM.name().asc()]);
    for tuple in repo.execute_query(&averages)? {
        println!(
            "team={} avg_age={}",
            tuple.get::<String>(0)?,
            tuple.get::<f64>(1)?
        );
    }

    let service = MemberSearchService::new(&repo);
    let found = service.search_with_where_params(Some("member2"), None)?;
    println!("search username=member2 matches={}", found.len());

    Ok(())
}
