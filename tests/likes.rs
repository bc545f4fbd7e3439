use board_core::db::open_db_in_memory;
use board_core::{
    ArticleDraft, ArticleRepository, ArticleSortKey, BoardService, LikeCountMode, LikeRepository,
    LikeService, LikeToggle, PageRequest, RepoError, SqliteArticleRepository, SqliteLikeRepository,
};

fn seed_article(conn: &rusqlite::Connection, board_id: i64, title: &str) -> i64 {
    let repo = SqliteArticleRepository::new(conn);
    repo.create_article(&ArticleDraft {
        board_id,
        category: "general".to_string(),
        title: title.to_string(),
        contents: "body".to_string(),
        created_by: 1,
    })
    .unwrap()
    .id
}

#[test]
fn duplicate_likes_collapse_to_one_row_and_both_report_success() {
    let conn = open_db_in_memory().unwrap();
    let article_id = seed_article(&conn, 1, "liked twice");
    let service = LikeService::new(SqliteLikeRepository::new(&conn));

    service.like(9, article_id).unwrap();
    service.like(9, article_id).unwrap();

    assert_eq!(service.like_count(article_id).unwrap(), 1);
    assert!(service.is_liked(9, article_id).unwrap());
}

#[test]
fn unliking_a_never_liked_article_is_a_no_op_success() {
    let conn = open_db_in_memory().unwrap();
    let article_id = seed_article(&conn, 1, "never liked");
    let service = LikeService::new(SqliteLikeRepository::new(&conn));

    service.unlike(9, article_id).unwrap();
    assert_eq!(service.like_count(article_id).unwrap(), 0);
}

#[test]
fn like_round_trip_counts_n_then_n_minus_one() {
    let conn = open_db_in_memory().unwrap();
    let article_id = seed_article(&conn, 1, "counted");
    let service = LikeService::new(SqliteLikeRepository::new(&conn));

    for user_id in 1..=5 {
        service.like(user_id, article_id).unwrap();
    }
    assert_eq!(service.like_count(article_id).unwrap(), 5);

    service.unlike(3, article_id).unwrap();
    assert_eq!(service.like_count(article_id).unwrap(), 4);
    assert_eq!(
        service.users_who_liked(article_id).unwrap(),
        vec![1, 2, 4, 5]
    );
}

#[test]
fn liked_article_ids_lists_newest_article_first() {
    let conn = open_db_in_memory().unwrap();
    let older = seed_article(&conn, 1, "older");
    let newer = seed_article(&conn, 1, "newer");
    let skipped = seed_article(&conn, 1, "not liked");
    let service = LikeService::new(SqliteLikeRepository::new(&conn));

    service.like(9, older).unwrap();
    service.like(9, newer).unwrap();
    service.like(8, skipped).unwrap();

    assert_eq!(service.liked_article_ids(9).unwrap(), vec![newer, older]);
}

#[test]
fn toggle_flips_state_both_ways() {
    let conn = open_db_in_memory().unwrap();
    let article_id = seed_article(&conn, 1, "toggled");
    let service = LikeService::new(SqliteLikeRepository::new(&conn));

    assert_eq!(service.toggle(4, article_id).unwrap(), LikeToggle::Liked);
    assert_eq!(service.toggle(4, article_id).unwrap(), LikeToggle::Unliked);
    assert!(!service.is_liked(4, article_id).unwrap());
}

#[test]
fn liking_a_missing_article_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLikeRepository::new(&conn);

    assert!(matches!(
        repo.like(1, 12345),
        Err(RepoError::NotFound { entity: "article", .. })
    ));
}

#[test]
fn deleting_an_article_cascades_its_likes() {
    let conn = open_db_in_memory().unwrap();
    let article_id = seed_article(&conn, 1, "doomed");
    let likes = SqliteLikeRepository::new(&conn);
    likes.like(1, article_id).unwrap();
    likes.like(2, article_id).unwrap();

    SqliteArticleRepository::new(&conn)
        .delete_article(article_id)
        .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM user_like_article;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn hot_articles_threshold_is_inclusive_in_both_modes() {
    let conn = open_db_in_memory().unwrap();
    let at_threshold = seed_article(&conn, 1, "exactly ten likes");
    let below = seed_article(&conn, 1, "nine likes");
    let likes = SqliteLikeRepository::new(&conn);

    for user_id in 1..=10 {
        likes.like(user_id, at_threshold).unwrap();
    }
    for user_id in 1..=9 {
        likes.like(user_id, below).unwrap();
    }

    let service = BoardService::new(SqliteArticleRepository::new(&conn));
    let request = PageRequest::<ArticleSortKey>::default();

    for mode in [LikeCountMode::Exact, LikeCountMode::Fast] {
        let page = service.hot_articles(1, 10, mode, None, &request).unwrap();
        assert_eq!(page.total_count, 1, "mode {mode:?}");
        assert_eq!(page.items[0].id, at_threshold);
    }
}

#[test]
fn both_like_count_modes_agree_on_unliked_articles_at_zero_threshold() {
    let conn = open_db_in_memory().unwrap();
    seed_article(&conn, 1, "no likes at all");

    let service = BoardService::new(SqliteArticleRepository::new(&conn));
    let request = PageRequest::<ArticleSortKey>::default();

    for mode in [LikeCountMode::Exact, LikeCountMode::Fast] {
        let page = service.hot_articles(1, 0, mode, None, &request).unwrap();
        assert_eq!(page.total_count, 1, "mode {mode:?}");
    }
}
