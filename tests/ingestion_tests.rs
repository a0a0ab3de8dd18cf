//! League ingestion against an in-memory store and fixed sheet tables.

use league_ledger::database::{League, LeagueStore, SqliteStore};
use league_ledger::domain::AliasRegistry;
use league_ledger::errors::ReconcileError;
use league_ledger::services::ingestion::IngestionService;
use league_ledger::testing::StaticSource;

const STANDINGS: &str = "Standings!A5:10000";
const MATCHES: &str = "Matches!A:Z";

fn sheet_league(code: &str, doc_id: &str) -> League {
    League {
        code: code.to_string(),
        doc_id: Some(doc_id.to_string()),
        entropy_sheet: true,
        ..League::default()
    }
}

fn standings(ranks: [&str; 3]) -> Vec<Vec<String>> {
    let rows: [[&str; 4]; 5] = [
        ["RANK", "PLAYER NAME", "ARENA ID", "OMW%"],
        [ranks[0], "Jace", "Jace#1", "60%"],
        [ranks[1], "Lili", "Lili#2", "55.5%"],
        [ranks[2], "Chandra", "Chandra#3", "#N/A"],
        ["", "ENTROPY", "", ""],
    ];
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn klr_source(ranks: [&str; 3]) -> StaticSource {
    StaticSource::new()
        .with_owned_rows("klr-doc", STANDINGS, standings(ranks))
        .with_rows(
            "klr-doc",
            MATCHES,
            &[
                &["Timestamp", "Winner Name", "Loser Name", "Result"],
                &["2024-03-01 10:00:00", "Jace", "Lili", "2-1"],
                &["2024-03-02 10:00:00", "Lili - Lili#2", "Chandra", "2-0"],
                &["2024-03-03 10:00:00", "ENTROPY", "Chandra", "2-0"],
                &["2024-03-04 10:00:00", "Jace", "ENTROPY", "2-0"],
            ],
        )
}

fn service(store: &SqliteStore, source: StaticSource) -> IngestionService<SqliteStore, StaticSource> {
    IngestionService::new(store.clone(), source, AliasRegistry::default(), "stats")
}

fn match_set(store: &SqliteStore, code: &str) -> Vec<(String, Option<i64>, i64, String)> {
    store
        .list_matches(code)
        .unwrap()
        .into_iter()
        .map(|m| (m.played_at.to_string(), m.winner_id, m.loser_id, m.score))
        .collect()
}

#[tokio::test]
async fn first_ingest_creates_players_entries_and_matches() {
    let store = SqliteStore::in_memory().unwrap();
    store.create_league(&sheet_league("KLR", "klr-doc")).unwrap();

    let report = service(&store, klr_source(["1", "2", "3"]))
        .ingest_league("KLR")
        .await
        .unwrap();

    assert_eq!(report.players_created, 3);
    assert_eq!(report.entries_created, 3);
    assert_eq!(report.matches_written, 3);
    assert_eq!(report.matches_skipped, 1);

    let matches = store.list_matches("KLR").unwrap();
    assert_eq!(matches.len(), 3);
    assert!(matches[0].winner_id.is_some());
    assert_eq!(matches[2].winner_id, None);
}

#[tokio::test]
async fn second_ingest_writes_nothing_new() {
    let store = SqliteStore::in_memory().unwrap();
    store.create_league(&sheet_league("KLR", "klr-doc")).unwrap();
    let service = service(&store, klr_source(["1", "2", "3"]));

    service.ingest_league("KLR").await.unwrap();
    let before = match_set(&store, "KLR");
    let report = service.ingest_league("KLR").await.unwrap();

    assert_eq!(report.players_created, 0);
    assert_eq!(report.entries_created, 0);
    assert_eq!(report.entries_updated, 0);
    assert_eq!(report.entries_unchanged, 3);
    assert_eq!(match_set(&store, "KLR"), before);
}

#[tokio::test]
async fn changed_ranks_are_updated() {
    let store = SqliteStore::in_memory().unwrap();
    store.create_league(&sheet_league("KLR", "klr-doc")).unwrap();
    service(&store, klr_source(["1", "2", "3"]))
        .ingest_league("KLR")
        .await
        .unwrap();

    let report = service(&store, klr_source(["2", "1", "3"]))
        .ingest_league("KLR")
        .await
        .unwrap();

    assert_eq!(report.entries_updated, 2);
    assert_eq!(report.entries_unchanged, 1);
}

#[tokio::test]
async fn failed_matches_keep_previous_match_set() {
    let store = SqliteStore::in_memory().unwrap();
    store.create_league(&sheet_league("KLR", "klr-doc")).unwrap();
    service(&store, klr_source(["1", "2", "3"]))
        .ingest_league("KLR")
        .await
        .unwrap();
    let before = match_set(&store, "KLR");

    let broken = StaticSource::new()
        .with_owned_rows("klr-doc", STANDINGS, standings(["1", "2", "3"]))
        .with_rows(
            "klr-doc",
            MATCHES,
            &[
                &["Timestamp", "Winner Name", "Loser Name", "Result"],
                &["2024-03-05 10:00:00", "Jace", "Nobody", "2-0"],
            ],
        );
    let err = service(&store, broken).ingest_league("KLR").await.unwrap_err();

    assert_eq!(err.league, "KLR");
    assert!(matches!(err.source, ReconcileError::NoMatch(_)));
    assert_eq!(match_set(&store, "KLR"), before);
}

#[tokio::test]
async fn unknown_league_is_no_match() {
    let store = SqliteStore::in_memory().unwrap();

    let err = service(&store, StaticSource::new())
        .ingest_league("NOPE")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "NoMatch");
}

#[tokio::test]
async fn ingest_all_continues_past_failed_league() {
    let store = SqliteStore::in_memory().unwrap();
    store.create_league(&sheet_league("KLR", "klr-doc")).unwrap();
    store.create_league(&sheet_league("MKM", "mkm-doc")).unwrap();

    let summary = service(&store, klr_source(["1", "2", "3"]))
        .ingest_all()
        .await
        .unwrap();

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].league, "KLR");
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].league, "MKM");
    assert_eq!(summary.failures[0].kind(), "Source");
}

#[tokio::test]
async fn stats_sheet_league_pairs_half_records() {
    let half = |code: &str, player: &str, result: &str| -> Vec<String> {
        let mut cells = vec![String::new(); 13];
        cells[0] = code.to_string();
        cells[1] = "DMU".to_string();
        cells[3] = "2023-09-10 19:30:00".to_string();
        cells[4] = player.to_string();
        cells[5] = result.to_string();
        cells[10] = "2-1".to_string();
        cells
    };
    let source = StaticSource::new()
        .with_columns(
            "stats",
            "Players By League",
            &[&["League", "DMU", "Jace - Jace#1", "Lili - Lili#2"]],
        )
        .with_owned_rows(
            "stats",
            "Matches KLR-Present!A2:M",
            vec![
                half("m1", "Lili - Lili#2", "Loss"),
                half("m1", "Jace - Jace#1", "Win"),
            ],
        );
    let store = SqliteStore::in_memory().unwrap();
    store
        .create_league(&League {
            code: "DMU".to_string(),
            ..League::default()
        })
        .unwrap();

    let report = service(&store, source).ingest_league("DMU").await.unwrap();

    assert_eq!(report.players_created, 2);
    assert_eq!(report.matches_written, 1);
    let m = &store.list_matches("DMU").unwrap()[0];
    let winner = store.find_player(m.winner_id.unwrap()).unwrap().unwrap();
    assert_eq!(winner.display_name, "Jace - Jace#1");
    assert_eq!(m.score, "2-1");
}

#[tokio::test]
async fn refresh_writes_only_changed_stats() {
    let store = SqliteStore::in_memory().unwrap();
    store.create_league(&sheet_league("KLR", "klr-doc")).unwrap();
    let source = klr_source(["1", "2", "3"])
        .with_rows(
            "stats",
            "Cumulative Record!E2:I",
            &[&["Jace - Jace#1", "10", "5", "66.7%"], &["Lili - Lili#2", "5", "5", "50%"]],
        )
        .with_rows("stats", "Wins, Top8s, Top16s!D2:F", &[&["Jace - Jace#1", "4", "6"]]);
    let service = service(&store, source);
    service.ingest_league("KLR").await.unwrap();

    let first = service.refresh_win_rates().await.unwrap();
    let second = service.refresh_win_rates().await.unwrap();
    let top8s = service.refresh_top8s().await.unwrap();

    assert_eq!((first.checked, first.updated), (2, 2));
    assert_eq!((second.checked, second.updated), (2, 0));
    assert_eq!((top8s.checked, top8s.updated), (1, 1));
}

#[tokio::test]
async fn refresh_fails_on_unknown_player() {
    let store = SqliteStore::in_memory().unwrap();
    let source = StaticSource::new().with_rows(
        "stats",
        "Wins, Top8s, Top16s!D2:F",
        &[&["Ghost - Ghost#0", "1"]],
    );

    let err = service(&store, source).refresh_top8s().await.unwrap_err();

    assert!(matches!(err, ReconcileError::NoMatch(_)));
}
