use board_core::db::open_db_in_memory;
use board_core::{
    ArticleDraft, ArticleRepository, FileAttachmentDraft, FileAttachmentRepository, FileFilter,
    FileKind, FileService, FileSortKey, PageRequest, RepoError, SqliteArticleRepository,
    SqliteFileAttachmentRepository,
};
use rusqlite::params;

fn seed_article(conn: &rusqlite::Connection) -> i64 {
    SqliteArticleRepository::new(conn)
        .create_article(&ArticleDraft {
            board_id: 1,
            category: "general".to_string(),
            title: "host article".to_string(),
            contents: "body".to_string(),
            created_by: 1,
        })
        .unwrap()
        .id
}

fn upload(
    article_id: Option<i64>,
    uploaded_by: i64,
    filename: &str,
    is_private: bool,
) -> FileAttachmentDraft {
    FileAttachmentDraft {
        filepath: format!("uploads/{filename}"),
        original_filename: filename.to_string(),
        is_private,
        uploaded_by,
        kind: Some(FileKind::Attachment),
        article_id,
        submission_id: None,
        filesize: 512,
    }
}

#[test]
fn create_get_and_delete_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let article_id = seed_article(&conn);
    let repo = SqliteFileAttachmentRepository::new(&conn);

    let created = repo
        .create_attachment(&upload(Some(article_id), 3, "report.pdf", false))
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.article_id, Some(article_id));
    assert_eq!(created.kind, Some(FileKind::Attachment));

    let fetched = repo.get_attachment(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);

    repo.delete_attachment(created.id).unwrap();
    assert!(repo.get_attachment(created.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_attachment(created.id),
        Err(RepoError::NotFound { .. })
    ));
}

#[test]
fn conflicting_owner_references_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let article_id = seed_article(&conn);
    let repo = SqliteFileAttachmentRepository::new(&conn);

    let mut both = upload(Some(article_id), 3, "both.png", false);
    both.submission_id = Some(8);

    assert!(matches!(
        repo.create_attachment(&both),
        Err(RepoError::Attachment(_))
    ));
}

#[test]
fn orphaned_uploads_are_legal_and_searchable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFileAttachmentRepository::new(&conn);

    repo.create_attachment(&upload(None, 3, "pending.zip", false))
        .unwrap();

    let filter = FileFilter {
        uploaded_by: Some(3),
        ..FileFilter::default()
    };
    let page = repo
        .search_attachments(&filter, &PageRequest::default())
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].article_id, None);
}

#[test]
fn filename_search_is_case_insensitive_substring() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFileAttachmentRepository::new(&conn);
    repo.create_attachment(&upload(None, 1, "Quarterly-Report.PDF", false))
        .unwrap();
    repo.create_attachment(&upload(None, 1, "photo.jpg", false))
        .unwrap();

    let service = FileService::new(SqliteFileAttachmentRepository::new(&conn));
    let page = service
        .search_filenames("report", &PageRequest::default())
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].original_filename, "Quarterly-Report.PDF");
}

#[test]
fn free_text_search_covers_filepath() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFileAttachmentRepository::new(&conn);
    repo.create_attachment(&FileAttachmentDraft {
        filepath: "archive/2024/scan.dat".to_string(),
        original_filename: "scan.dat".to_string(),
        is_private: false,
        uploaded_by: 1,
        kind: None,
        article_id: None,
        submission_id: None,
        filesize: 10,
    })
    .unwrap();

    let service = FileService::new(SqliteFileAttachmentRepository::new(&conn));
    let page = service.search_text("2024", &PageRequest::default()).unwrap();
    assert_eq!(page.total_count, 1);

    let miss = service.search_text("2023", &PageRequest::default()).unwrap();
    assert_eq!(miss.total_count, 0);
}

#[test]
fn privacy_filter_keeps_page_totals_truthful() {
    let conn = open_db_in_memory().unwrap();
    let article_id = seed_article(&conn);
    let repo = SqliteFileAttachmentRepository::new(&conn);
    repo.create_attachment(&upload(Some(article_id), 1, "public.txt", false))
        .unwrap();
    repo.create_attachment(&upload(Some(article_id), 1, "secret.txt", true))
        .unwrap();

    let service = FileService::new(SqliteFileAttachmentRepository::new(&conn));
    let request = PageRequest::<FileSortKey>::default();

    let public_only = service
        .list_for_article(article_id, true, &request)
        .unwrap();
    assert_eq!(public_only.total_count, 1);
    assert_eq!(public_only.items[0].original_filename, "public.txt");

    let everything = service
        .list_for_article(article_id, false, &request)
        .unwrap();
    assert_eq!(everything.total_count, 2);
}

#[test]
fn kind_preset_separates_images_from_attachments() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFileAttachmentRepository::new(&conn);

    let mut image = upload(None, 2, "banner.png", false);
    image.kind = Some(FileKind::Image);
    repo.create_attachment(&image).unwrap();
    repo.create_attachment(&upload(None, 2, "notes.txt", false))
        .unwrap();

    let service = FileService::new(SqliteFileAttachmentRepository::new(&conn));
    let request = PageRequest::<FileSortKey>::default();

    let images = service.list_by_kind(FileKind::Image, &request).unwrap();
    assert_eq!(images.total_count, 1);
    assert_eq!(images.items[0].original_filename, "banner.png");

    let attachments = service
        .list_by_kind(FileKind::Attachment, &request)
        .unwrap();
    assert_eq!(attachments.total_count, 1);
    assert_eq!(attachments.items[0].original_filename, "notes.txt");
}

#[test]
fn uploader_preset_scopes_by_user_and_respects_privacy_flag() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFileAttachmentRepository::new(&conn);
    repo.create_attachment(&upload(None, 6, "mine-public.txt", false))
        .unwrap();
    repo.create_attachment(&upload(None, 6, "mine-secret.txt", true))
        .unwrap();
    repo.create_attachment(&upload(None, 7, "theirs.txt", false))
        .unwrap();

    let service = FileService::new(SqliteFileAttachmentRepository::new(&conn));
    let request = PageRequest::<FileSortKey>::default();

    let everything = service.list_for_uploader(6, false, &request).unwrap();
    assert_eq!(everything.total_count, 2);
    assert!(everything.items.iter().all(|f| f.uploaded_by == 6));

    let public_only = service.list_for_uploader(6, true, &request).unwrap();
    assert_eq!(public_only.total_count, 1);
    assert_eq!(public_only.items[0].original_filename, "mine-public.txt");
}

#[test]
fn counts_and_recent_uploads_window() {
    let conn = open_db_in_memory().unwrap();
    let article_id = seed_article(&conn);
    let repo = SqliteFileAttachmentRepository::new(&conn);

    for i in 0..4 {
        repo.create_attachment(&upload(Some(article_id), 5, &format!("f{i}.txt"), false))
            .unwrap();
    }
    // Stagger upload times so the recency window is meaningful.
    conn.execute(
        "UPDATE file_attachment SET uploaded_at = id * 1000;",
        [],
    )
    .unwrap();

    assert_eq!(repo.count_for_article(article_id).unwrap(), 4);
    assert_eq!(repo.count_for_uploader(5).unwrap(), 4);

    let recent = repo.recent_uploads(5, 2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].original_filename, "f3.txt");
    assert_eq!(recent[1].original_filename, "f2.txt");
}

#[test]
fn set_private_flips_visibility() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFileAttachmentRepository::new(&conn);
    let created = repo
        .create_attachment(&upload(None, 2, "flipme.txt", false))
        .unwrap();

    repo.set_private(created.id, true).unwrap();
    assert!(repo.get_attachment(created.id).unwrap().unwrap().is_private);
}

#[test]
fn corrupt_kind_value_surfaces_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFileAttachmentRepository::new(&conn);
    let created = repo
        .create_attachment(&upload(None, 2, "weird.bin", false))
        .unwrap();

    conn.execute(
        "UPDATE file_attachment SET kind = 'hologram' WHERE id = ?1;",
        params![created.id],
    )
    .unwrap();

    assert!(matches!(
        repo.get_attachment(created.id),
        Err(RepoError::InvalidData(_))
    ));
}
