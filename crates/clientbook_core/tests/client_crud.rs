use clientbook_core::db::open_db_in_memory;
use clientbook_core::{
    ClientFilter, ClientPatch, ClientRepository, ClientService, NewClient, PhoneUpdate, RepoError,
    SqliteClientRepository,
};
use rusqlite::Connection;

fn ivan() -> NewClient {
    NewClient::new("Иван", "Иванов", "ivanov@example.com").with_phones(["123456789", "987654321"])
}

fn phone_count(conn: &Connection, client_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM phones WHERE client_id = ?1;",
        [client_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn create_client_with_phones_stores_every_phone() {
    let mut conn = open_db_in_memory().unwrap();
    let id = {
        let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();
        let id = repo.create_client(&ivan()).unwrap();

        let record = repo.get_client(id).unwrap().unwrap();
        assert_eq!(record.client.first_name.as_deref(), Some("Иван"));
        assert_eq!(record.client.last_name.as_deref(), Some("Иванов"));
        assert_eq!(record.client.email.as_deref(), Some("ivanov@example.com"));
        assert_eq!(record.phone_numbers(), vec!["123456789", "987654321"]);

        let rows = repo
            .find_clients(&ClientFilter::by_email("ivanov@example.com"))
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.client_id == id
            && row.first_name.as_deref() == Some("Иван")
            && row.email.as_deref() == Some("ivanov@example.com")));
        id
    };

    assert_eq!(phone_count(&conn, id), 2);
}

#[test]
fn create_client_without_phones_is_allowed() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();

    let id = repo.create_client(&NewClient::default()).unwrap();

    let record = repo.get_client(id).unwrap().unwrap();
    assert_eq!(record.client.email, None);
    assert!(record.phones.is_empty());
}

#[test]
fn create_client_stores_blank_values_as_null() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();

    let first = repo.create_client(&NewClient::new("A", " ", "")).unwrap();
    let second = repo.create_client(&NewClient::new("B", "B", "  ")).unwrap();

    let first = repo.get_client(first).unwrap().unwrap();
    assert_eq!(first.client.last_name, None);
    assert_eq!(first.client.email, None);
    let second = repo.get_client(second).unwrap().unwrap();
    assert_eq!(second.client.email, None);
}

#[test]
fn update_with_empty_patch_checks_existence_and_changes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();
    let id = repo.create_client(&ivan()).unwrap();

    repo.update_client(id, &ClientPatch::default()).unwrap();
    let record = repo.get_client(id).unwrap().unwrap();
    assert_eq!(record.client.email.as_deref(), Some("ivanov@example.com"));
    assert_eq!(record.phones.len(), 2);

    let err = repo
        .update_client(id + 1, &ClientPatch::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id + 1));
}

#[test]
fn client_ids_are_strictly_increasing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();

    let first = repo
        .create_client(&NewClient::new("A", "A", "a@example.com"))
        .unwrap();
    repo.delete_client(first).unwrap();
    let second = repo
        .create_client(&NewClient::new("B", "B", "b@example.com"))
        .unwrap();

    assert!(second > first);
}

#[test]
fn duplicate_email_is_rejected_and_first_client_is_untouched() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();

    let first = repo.create_client(&ivan()).unwrap();
    let err = repo
        .create_client(
            &NewClient::new("Пётр", "Петров", "ivanov@example.com").with_phones(["555"]),
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation(_)), "got {err}");

    let record = repo.get_client(first).unwrap().unwrap();
    assert_eq!(record.client.first_name.as_deref(), Some("Иван"));
    assert_eq!(record.phones.len(), 2);

    let everything = repo.find_clients(&ClientFilter::default()).unwrap();
    assert_eq!(everything.len(), 2, "failed create must not leave rows");
}

#[test]
fn add_phone_allows_duplicates_and_rejects_unknown_client() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();

    let id = repo.create_client(&ivan()).unwrap();
    let first = repo.add_phone(id, "123456789").unwrap();
    let second = repo.add_phone(id, "555000111").unwrap();
    assert!(second > first);

    let record = repo.get_client(id).unwrap().unwrap();
    assert_eq!(
        record.phone_numbers(),
        vec!["123456789", "987654321", "123456789", "555000111"]
    );

    let err = repo.add_phone(id + 100, "1").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id + 100));
}

#[test]
fn update_replaces_phone_list() {
    let mut conn = open_db_in_memory().unwrap();
    let id = {
        let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();
        let id = repo.create_client(&ivan()).unwrap();
        repo.update_client(
            id,
            &ClientPatch {
                phones: PhoneUpdate::replace(["111222333"]),
                ..ClientPatch::default()
            },
        )
        .unwrap();

        let record = repo.get_client(id).unwrap().unwrap();
        assert_eq!(record.phone_numbers(), vec!["111222333"]);
        id
    };

    assert_eq!(phone_count(&conn, id), 1);
}

#[test]
fn update_without_phones_keeps_them_and_empty_list_clears_them() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();
    let id = repo.create_client(&ivan()).unwrap();

    repo.update_client(
        id,
        &ClientPatch {
            email: Some("ivanov_new@example.com".to_string()),
            ..ClientPatch::default()
        },
    )
    .unwrap();
    let record = repo.get_client(id).unwrap().unwrap();
    assert_eq!(record.client.email.as_deref(), Some("ivanov_new@example.com"));
    assert_eq!(record.phones.len(), 2);

    repo.update_client(
        id,
        &ClientPatch {
            phones: PhoneUpdate::Replace(Vec::new()),
            ..ClientPatch::default()
        },
    )
    .unwrap();
    let record = repo.get_client(id).unwrap().unwrap();
    assert!(record.phones.is_empty());
    assert_eq!(record.client.email.as_deref(), Some("ivanov_new@example.com"));
}

#[test]
fn update_sets_only_supplied_fields_and_blank_clears() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();
    let id = repo.create_client(&ivan()).unwrap();

    repo.update_client(
        id,
        &ClientPatch {
            first_name: Some("Иоанн".to_string()),
            last_name: Some("  ".to_string()),
            ..ClientPatch::default()
        },
    )
    .unwrap();

    let record = repo.get_client(id).unwrap().unwrap();
    assert_eq!(record.client.first_name.as_deref(), Some("Иоанн"));
    assert_eq!(record.client.last_name, None);
    assert_eq!(record.client.email.as_deref(), Some("ivanov@example.com"));
}

#[test]
fn update_unknown_client_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();

    let err = repo
        .update_client(
            42,
            &ClientPatch {
                first_name: Some("Nobody".to_string()),
                ..ClientPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
}

#[test]
fn update_with_taken_email_rolls_back_every_change() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();
    let ivan_id = repo.create_client(&ivan()).unwrap();
    repo.create_client(&NewClient::new("Пётр", "Петров", "petrov@example.com"))
        .unwrap();

    let err = repo
        .update_client(
            ivan_id,
            &ClientPatch {
                first_name: Some("Changed".to_string()),
                email: Some("petrov@example.com".to_string()),
                phones: PhoneUpdate::Replace(Vec::new()),
                ..ClientPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation(_)), "got {err}");

    let record = repo.get_client(ivan_id).unwrap().unwrap();
    assert_eq!(record.client.first_name.as_deref(), Some("Иван"));
    assert_eq!(record.phones.len(), 2);
}

#[test]
fn delete_phone_only_touches_matching_client_and_number() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();
    let ivan_id = repo.create_client(&ivan()).unwrap();
    repo.add_phone(ivan_id, "123456789").unwrap();
    let petr_id = repo
        .create_client(
            &NewClient::new("Пётр", "Петров", "petrov@example.com").with_phones(["123456789"]),
        )
        .unwrap();

    let removed = repo.delete_phone(ivan_id, "123456789").unwrap();
    assert_eq!(removed, 2, "both duplicate rows go");

    let ivan = repo.get_client(ivan_id).unwrap().unwrap();
    assert_eq!(ivan.phone_numbers(), vec!["987654321"]);
    let petr = repo.get_client(petr_id).unwrap().unwrap();
    assert_eq!(petr.phone_numbers(), vec!["123456789"]);

    assert_eq!(repo.delete_phone(ivan_id, "000").unwrap(), 0);
}

#[test]
fn delete_client_cascades_to_phones() {
    let mut conn = open_db_in_memory().unwrap();
    let id = {
        let mut repo = SqliteClientRepository::try_new(&mut conn).unwrap();
        let id = repo.create_client(&ivan()).unwrap();
        repo.delete_client(id).unwrap();

        assert!(repo.get_client(id).unwrap().is_none());
        let rows = repo
            .find_clients(&ClientFilter::by_email("ivanov@example.com"))
            .unwrap();
        assert!(rows.is_empty());

        let err = repo.delete_client(id).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
        id
    };

    assert_eq!(phone_count(&conn, id), 0);
}

#[test]
fn phone_insert_for_missing_client_is_a_foreign_key_violation() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO phones (client_id, phone_number) VALUES (999, '1');",
            [],
        )
        .unwrap_err();
    assert!(matches!(
        RepoError::from(err),
        RepoError::ForeignKeyViolation(_)
    ));
}

#[test]
fn service_walks_full_lifecycle() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteClientRepository::try_new(&mut conn).unwrap();
    let mut service = ClientService::new(repo);

    let id = service.create_client(&ivan()).unwrap();
    assert_eq!(
        service
            .find_clients(&ClientFilter::by_first_name("Иван"))
            .unwrap()
            .len(),
        2
    );

    service
        .update_client(
            id,
            &ClientPatch {
                email: Some("ivanov_new@example.com".to_string()),
                phones: PhoneUpdate::replace(["111222333"]),
                ..ClientPatch::default()
            },
        )
        .unwrap();
    let by_new_email = ClientFilter::by_email("ivanov_new@example.com");
    let rows = service.find_clients(&by_new_email).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].phone_number.as_deref(), Some("111222333"));

    assert_eq!(service.delete_phone(id, "111222333").unwrap(), 1);
    let rows = service.find_clients(&by_new_email).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].phone_number, None);

    service.delete_client(id).unwrap();
    assert!(service.find_clients(&by_new_email).unwrap().is_empty());
    assert!(service.get_client(id).unwrap().is_none());
}
