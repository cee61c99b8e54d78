mod common;

use common::{persist, seed};
use roster_core::db::open_db_in_memory;
use roster_core::query::{MemberSearchCondition, MemberTeamDto};
use roster_core::{Member, MemberSearchService, RepoError, SqliteMemberRepository};

fn usernames(rows: &[MemberTeamDto]) -> Vec<Option<String>> {
    rows.iter().map(|row| row.username.clone()).collect()
}

#[test]
fn search_by_team_and_minimum_age() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let roster = seed(&repo);
    let service = MemberSearchService::new(&repo);

    let condition = MemberSearchCondition {
        team_name: Some("teamB".to_string()),
        age_goe: Some(35),
        ..MemberSearchCondition::default()
    };
    let rows = service.search(&condition).unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.member_id, roster.members[3].id);
    assert_eq!(row.username.as_deref(), Some("member4"));
    assert_eq!(row.age, 40);
    assert_eq!(row.team_id, Some(roster.team_b.id));
    assert_eq!(row.team_name.as_deref(), Some("teamB"));
}

#[test]
fn blank_condition_returns_everyone_including_teamless_members() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);
    persist(&repo, Member::new(None, 5, None));
    let service = MemberSearchService::new(&repo);

    let condition = MemberSearchCondition {
        username: Some("  ".to_string()),
        team_name: Some(String::new()),
        ..MemberSearchCondition::default()
    };
    let rows = service.search(&condition).unwrap();

    assert_eq!(
        usernames(&rows),
        vec![
            Some("member1".to_string()),
            Some("member2".to_string()),
            Some("member3".to_string()),
            Some("member4".to_string()),
            None,
        ]
    );
    assert_eq!(rows[4].team_name, None);
}

#[test]
fn age_window_is_inclusive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);
    let service = MemberSearchService::new(&repo);

    let condition = MemberSearchCondition {
        age_goe: Some(20),
        age_loe: Some(30),
        ..MemberSearchCondition::default()
    };
    assert_eq!(
        usernames(&service.search(&condition).unwrap()),
        vec![Some("member2".to_string()), Some("member3".to_string())]
    );
}

#[test]
fn search_page_returns_slice_and_unpaged_total() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);
    let service = MemberSearchService::new(&repo);

    let page = service
        .search_page(&MemberSearchCondition::default(), 1, 2)
        .unwrap();

    assert_eq!(page.total, 4);
    assert_eq!(page.offset, 1);
    assert_eq!(page.limit, 2);
    assert_eq!(
        usernames(&page.items),
        vec![Some("member2".to_string()), Some("member3".to_string())]
    );
}

#[test]
fn search_page_total_follows_the_filter() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);
    let service = MemberSearchService::new(&repo);

    let condition = MemberSearchCondition {
        team_name: Some("teamA".to_string()),
        ..MemberSearchCondition::default()
    };
    let page = service.search_page(&condition, 0, 10).unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);

    let past_end = service.search_page(&condition, 5, 10).unwrap();
    assert_eq!(past_end.total, 2);
    assert!(past_end.items.is_empty());
}

#[test]
fn find_by_username_outcomes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed(&repo);
    let service = MemberSearchService::new(&repo);

    assert_eq!(service.find_by_username("member3").unwrap().age, 30);
    assert!(matches!(
        service.find_by_username("nobody"),
        Err(RepoError::NotFound("member"))
    ));
    assert!(matches!(
        service.find_by_username("   "),
        Err(RepoError::NotFound("member"))
    ));

    persist(&repo, Member::new(Some("member1"), 99, None));
    assert!(matches!(
        service.find_by_username("member1"),
        Err(RepoError::NonUniqueResult(2))
    ));
}
