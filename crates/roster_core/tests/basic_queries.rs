mod common;

use common::{names, persist, seed, usernames};
use roster_core::db::open_db_in_memory;
use roster_core::query::{Expr, ExprOps, QueryError, Select, MEMBER, TEAM};
use roster_core::{DataAccessEngine, Member, RepoError, SqliteMemberRepository};

#[test]
fn single_member_by_username() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select_from(MEMBER).where_(MEMBER.username().eq("member1"));
    let found = repo.fetch_one_member(&query).unwrap();

    assert_eq!(found.username.as_deref(), Some("member1"));
    assert_eq!(found.age, 10);
}

#[test]
fn chained_and_predicates_narrow_together() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let roster = seed(&repo);

    let query = Select::select_from(MEMBER).where_(
        MEMBER
            .username()
            .eq("member1")
            .and(MEMBER.age().eq(10))
            .and(MEMBER.team_id().eq(roster.team_a.id)),
    );
    let found = repo.fetch_one_member(&query).unwrap();
    assert_eq!(found.team_id, Some(roster.team_a.id));

    let query = Select::select_from(MEMBER)
        .where_(MEMBER.username().eq("member1").and(MEMBER.age().eq(20)));
    assert!(repo.fetch_members(&query).unwrap().is_empty());
}

#[test]
fn range_and_set_predicates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let between = Select::select_from(MEMBER)
        .where_(MEMBER.age().goe(20).and(MEMBER.age().loe(30)))
        .order_by([MEMBER.age().asc()]);
    assert_eq!(
        usernames(&repo.fetch_members(&between).unwrap()),
        names(&["member2", "member3"])
    );

    let listed = Select::select_from(MEMBER)
        .where_(MEMBER.age().in_values([10, 40]).and(MEMBER.username().ne("member4")));
    assert_eq!(
        usernames(&repo.fetch_members(&listed).unwrap()),
        names(&["member1"])
    );

    let either = Select::select_from(MEMBER)
        .where_(MEMBER.age().lt(15).or(MEMBER.age().gt(35)))
        .order_by([MEMBER.age().desc()]);
    assert_eq!(
        usernames(&repo.fetch_members(&either).unwrap()),
        names(&["member4", "member1"])
    );
}

#[test]
fn fetch_one_reports_empty_and_ambiguous_results() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let nobody = Select::select_from(MEMBER).where_(MEMBER.username().eq("nobody"));
    assert!(matches!(
        repo.fetch_one_member(&nobody),
        Err(RepoError::NotFound("member"))
    ));

    let everyone = Select::select_from(MEMBER);
    assert!(matches!(
        repo.fetch_one_member(&everyone),
        Err(RepoError::NonUniqueResult(4))
    ));
}

#[test]
fn sort_by_age_desc_then_username_nulls_last() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);
    persist(&repo, Member::new(None, 100, None));
    persist(&repo, Member::new(Some("member5"), 100, None));
    persist(&repo, Member::new(Some("member6"), 100, None));

    let query = Select::select_from(MEMBER)
        .where_(MEMBER.age().eq(100))
        .order_by([
            MEMBER.age().desc(),
            MEMBER.username().asc().nulls_last(),
        ]);
    let members = repo.fetch_members(&query).unwrap();

    assert_eq!(
        usernames(&members),
        vec![Some("member5".to_string()), Some("member6".to_string()), None]
    );
}

#[test]
fn nulls_first_puts_unnamed_members_ahead() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    persist(&repo, Member::new(Some("member5"), 100, None));
    persist(&repo, Member::new(None, 100, None));

    let query = Select::select_from(MEMBER).order_by([MEMBER.username().asc().nulls_first()]);
    let members = repo.fetch_members(&query).unwrap();

    assert_eq!(
        usernames(&members),
        vec![None, Some("member5".to_string())]
    );
}

#[test]
fn paging_skips_offset_and_caps_limit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select_from(MEMBER)
        .order_by([MEMBER.username().desc()])
        .offset(1)
        .limit(2);
    assert_eq!(
        usernames(&repo.fetch_members(&query).unwrap()),
        names(&["member3", "member2"])
    );

    let count_query = query.reprojected([MEMBER.count()]);
    let total: i64 = repo.execute_query(&count_query).unwrap()[0].get(0).unwrap();
    assert_eq!(total, 4);
}

#[test]
fn offset_without_limit_returns_the_tail() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select_from(MEMBER)
        .order_by([MEMBER.age().asc()])
        .offset(3);
    assert_eq!(
        usernames(&repo.fetch_members(&query).unwrap()),
        names(&["member4"])
    );
}

#[test]
fn aggregates_over_all_members() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select([
        MEMBER.count(),
        MEMBER.age().sum(),
        MEMBER.age().avg(),
        MEMBER.age().max(),
        MEMBER.age().min(),
    ])
    .from(MEMBER);
    let tuples = repo.execute_query(&query).unwrap();

    assert_eq!(tuples.len(), 1);
    let tuple = &tuples[0];
    assert_eq!(tuple.get::<i64>(0).unwrap(), 4);
    assert_eq!(tuple.get::<i64>(1).unwrap(), 100);
    assert_eq!(tuple.get::<f64>(2).unwrap(), 25.0);
    assert_eq!(tuple.get::<i64>(3).unwrap(), 40);
    assert_eq!(tuple.get::<i64>(4).unwrap(), 10);
}

#[test]
fn average_age_grouped_by_team_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select([TEAM.name().expr(), MEMBER.age().avg()])
        .from(MEMBER)
        .join(MEMBER.team(), TEAM)
        .group_by(TEAM.name())
        .order_by([TEAM.name().asc()]);
    let tuples = repo.execute_query(&query).unwrap();

    assert_eq!(tuples.len(), 2);
    assert_eq!(tuples[0].get::<String>(0).unwrap(), "teamA");
    assert_eq!(tuples[0].get::<f64>(1).unwrap(), 15.0);
    assert_eq!(tuples[1].get::<String>(0).unwrap(), "teamB");
    assert_eq!(tuples[1].get::<f64>(1).unwrap(), 35.0);
}

#[test]
fn having_filters_groups() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select([TEAM.name().expr(), MEMBER.age().avg()])
        .from(MEMBER)
        .join(MEMBER.team(), TEAM)
        .group_by(TEAM.name())
        .having(MEMBER.age().avg().gt(20));
    let tuples = repo.execute_query(&query).unwrap();

    assert_eq!(tuples.len(), 1);
    assert_eq!(tuples[0].get::<String>(0).unwrap(), "teamB");
}

#[test]
fn tuple_projection_reads_columns_by_position() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select([MEMBER.username().expr(), MEMBER.age().expr()])
        .from(MEMBER)
        .order_by([MEMBER.age().asc()]);
    let tuples = repo.execute_query(&query).unwrap();

    let rows = tuples
        .iter()
        .map(|tuple| {
            (
                tuple.get::<Option<String>>(0).unwrap(),
                tuple.get::<i64>(1).unwrap(),
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        vec![
            (Some("member1".to_string()), 10),
            (Some("member2".to_string()), 20),
            (Some("member3".to_string()), 30),
            (Some("member4".to_string()), 40),
        ]
    );
    assert!(matches!(
        tuples[0].get::<String>(2),
        Err(QueryError::ColumnOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn simple_case_maps_ages_to_labels() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select([MEMBER
        .age()
        .when(10)
        .then("ten")
        .when(20)
        .then("twenty")
        .otherwise("other")])
    .from(MEMBER)
    .order_by([MEMBER.age().asc()]);
    let labels = repo
        .execute_query(&query)
        .unwrap()
        .iter()
        .map(|tuple| tuple.get::<String>(0).unwrap())
        .collect::<Vec<_>>();

    assert_eq!(labels, vec!["ten", "twenty", "other", "other"]);
}

#[test]
fn concat_with_stringified_age() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select([MEMBER
        .username()
        .concat("_")
        .concat(MEMBER.age().string_value())])
    .from(MEMBER)
    .where_(MEMBER.username().eq("member1"));
    let tuples = repo.execute_query(&query).unwrap();

    assert_eq!(tuples.len(), 1);
    assert_eq!(tuples[0].get::<String>(0).unwrap(), "member1_10");
}

#[test]
fn constant_and_arithmetic_projections() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select([
        MEMBER.username().expr(),
        Expr::from("A"),
        MEMBER.age().multiply(2),
    ])
    .from(MEMBER)
    .where_(MEMBER.username().eq("member2"));
    let tuple = &repo.execute_query(&query).unwrap()[0];

    assert_eq!(tuple.get::<String>(1).unwrap(), "A");
    assert_eq!(tuple.get::<i64>(2).unwrap(), 40);
}

#[test]
fn members_of_team_and_find_member() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let roster = seed(&repo);

    let team_b = repo.members_of_team(roster.team_b.id).unwrap();
    assert_eq!(usernames(&team_b), names(&["member3", "member4"]));

    let first = &roster.members[0];
    assert_eq!(repo.find_member(first.id).unwrap().as_ref(), Some(first));
    assert_eq!(repo.find_member(uuid::Uuid::new_v4()).unwrap(), None);
}

#[test]
fn entity_fetch_rejects_scalar_projection() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);

    let query = Select::select([MEMBER.username().expr()]).from(MEMBER);
    assert!(matches!(
        repo.fetch_members(&query),
        Err(RepoError::Query(QueryError::UnexpectedProjection(_)))
    ));
}
