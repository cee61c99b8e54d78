mod common;

use common::{names, persist, seed, usernames};
use roster_core::db::open_db_in_memory;
use roster_core::query::{Expr, ExprOps, Select, MEMBER, TEAM};
use roster_core::{DataAccessEngine, Member, SqliteMemberRepository};

#[test]
fn inner_join_filters_on_team_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select_from(MEMBER)
        .join(MEMBER.team(), TEAM)
        .where_(TEAM.name().eq("teamA"))
        .order_by([MEMBER.username().asc()]);

    assert_eq!(
        usernames(&repo.fetch_members(&query).unwrap()),
        names(&["member1", "member2"])
    );
}

#[test]
fn theta_join_matches_username_to_team_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);
    persist(&repo, Member::named("teamA"));
    persist(&repo, Member::named("teamB"));
    persist(&repo, Member::named("teamC"));

    let query = Select::select_from(MEMBER)
        .from(TEAM)
        .where_(MEMBER.username().eq(TEAM.name()))
        .order_by([MEMBER.username().asc()]);

    assert_eq!(
        usernames(&repo.fetch_members(&query).unwrap()),
        names(&["teamA", "teamB"])
    );
}

#[test]
fn left_join_with_on_keeps_every_member() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let roster = seed(&repo);

    let query = Select::select([Expr::from(MEMBER), Expr::from(TEAM)])
        .from(MEMBER)
        .left_join(MEMBER.team(), TEAM)
        .on(TEAM.name().eq("teamA"))
        .order_by([MEMBER.username().asc()]);
    let pairs = repo.fetch_member_pairs(&query).unwrap();

    let shape = pairs
        .iter()
        .map(|(member, team)| (member.username.clone(), team.as_ref().map(|t| t.id)))
        .collect::<Vec<_>>();
    assert_eq!(
        shape,
        vec![
            (Some("member1".to_string()), Some(roster.team_a.id)),
            (Some("member2".to_string()), Some(roster.team_a.id)),
            (Some("member3".to_string()), None),
            (Some("member4".to_string()), None),
        ]
    );
}

#[test]
fn inner_join_with_on_behaves_like_where() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let with_on = Select::select([Expr::from(MEMBER), Expr::from(TEAM)])
        .from(MEMBER)
        .join(MEMBER.team(), TEAM)
        .on(TEAM.name().eq("teamA"))
        .order_by([MEMBER.username().asc()]);
    let with_where = Select::select([Expr::from(MEMBER), Expr::from(TEAM)])
        .from(MEMBER)
        .join(MEMBER.team(), TEAM)
        .where_(TEAM.name().eq("teamA"))
        .order_by([MEMBER.username().asc()]);

    let on_pairs = repo.fetch_member_pairs(&with_on).unwrap();
    let where_pairs = repo.fetch_member_pairs(&with_where).unwrap();
    assert_eq!(on_pairs.len(), 2);
    assert_eq!(on_pairs, where_pairs);
    assert!(on_pairs
        .iter()
        .all(|(_, team)| team.as_ref().map(|t| t.name.as_str()) == Some("teamA")));
}

#[test]
fn left_join_unrelated_team_by_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let roster = seed(&repo);
    persist(&repo, Member::named("teamA"));
    persist(&repo, Member::named("teamB"));

    let query = Select::select([Expr::from(MEMBER), Expr::from(TEAM)])
        .from(MEMBER)
        .left_join_unrelated(TEAM)
        .on(MEMBER.username().eq(TEAM.name()))
        .order_by([MEMBER.username().asc()]);
    let pairs = repo.fetch_member_pairs(&query).unwrap();

    assert_eq!(pairs.len(), 6);
    let matched = pairs
        .iter()
        .filter_map(|(member, team)| {
            team.as_ref()
                .map(|team| (member.username.clone(), team.id))
        })
        .collect::<Vec<_>>();
    assert_eq!(
        matched,
        vec![
            (Some("teamA".to_string()), roster.team_a.id),
            (Some("teamB".to_string()), roster.team_b.id),
        ]
    );
}

#[test]
fn fetch_join_loads_member_with_team_in_one_query() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let roster = seed(&repo);

    let query = Select::select([Expr::from(MEMBER), Expr::from(TEAM)])
        .from(MEMBER)
        .join(MEMBER.team(), TEAM)
        .where_(MEMBER.username().eq("member1"));
    let pairs = repo.fetch_member_pairs(&query).unwrap();

    assert_eq!(pairs.len(), 1);
    let (member, team) = &pairs[0];
    assert_eq!(member.username.as_deref(), Some("member1"));
    assert_eq!(team.as_ref(), Some(&roster.team_a));
}

#[test]
fn member_without_team_is_dropped_by_inner_join_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);
    persist(&repo, Member::named("loner"));

    let inner = Select::select([Expr::from(MEMBER), Expr::from(TEAM)])
        .from(MEMBER)
        .join(MEMBER.team(), TEAM);
    let left = Select::select([Expr::from(MEMBER), Expr::from(TEAM)])
        .from(MEMBER)
        .left_join(MEMBER.team(), TEAM);

    assert_eq!(repo.fetch_member_pairs(&inner).unwrap().len(), 4);
    let left_pairs = repo.fetch_member_pairs(&left).unwrap();
    assert_eq!(left_pairs.len(), 5);
    assert!(left_pairs
        .iter()
        .any(|(member, team)| member.username.as_deref() == Some("loner") && team.is_none()));
}
