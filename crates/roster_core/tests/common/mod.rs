#![allow(dead_code)]

use roster_core::{DataAccessEngine, Member, SqliteMemberRepository, Team};

/// The four-member, two-team roster every query test starts from.
pub struct Roster {
    pub team_a: Team,
    pub team_b: Team,
    pub members: Vec<Member>,
}

pub fn seed(repo: &SqliteMemberRepository<'_>) -> Roster {
    let team_a = Team::new("teamA");
    let team_b = Team::new("teamB");
    repo.persist_team(&team_a).unwrap();
    repo.persist_team(&team_b).unwrap();

    let members = vec![
        Member::new(Some("member1"), 10, Some(&team_a)),
        Member::new(Some("member2"), 20, Some(&team_a)),
        Member::new(Some("member3"), 30, Some(&team_b)),
        Member::new(Some("member4"), 40, Some(&team_b)),
    ];
    for member in &members {
        repo.persist_member(member).unwrap();
    }

    Roster {
        team_a,
        team_b,
        members,
    }
}

pub fn persist(repo: &SqliteMemberRepository<'_>, member: Member) -> Member {
    repo.persist_member(&member).unwrap();
    member
}

pub fn usernames(members: &[Member]) -> Vec<Option<String>> {
    members.iter().map(|member| member.username.clone()).collect()
}

pub fn names(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|value| Some(value.to_string())).collect()
}
