//! End-to-end console sessions driven from an in-memory input.

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use unmo_bot::analyzer::ScriptAnalyzer;
use unmo_bot::console;
use unmo_bot::dictionary::{Dictionary, DictionaryPaths};
use unmo_bot::engine::{Engine, WeightTable, Weighted};
use unmo_bot::responder::{RandomResponder, WhatResponder};
use unmo_bot::training::TrainingQueue;

fn engine_in(dir: &TempDir) -> Engine {
    let dict = Dictionary::load(DictionaryPaths::in_dir(dir.path())).unwrap();
    Engine::new("proto", dict, Box::new(ScriptAnalyzer)).with_seed(3)
}

async fn session(engine: &mut Engine, queue: &mut TrainingQueue, input: &str) -> String {
    let mut out = Vec::new();
    console::run(engine, queue, input.as_bytes(), &mut out, CancellationToken::new())
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn what_responder_session() {
    let dir = TempDir::new().unwrap();
    let table = WeightTable::new(vec![Weighted { responder: Box::new(WhatResponder), weight: 1 }]).unwrap();
    let mut engine = engine_in(&dir).with_table(table);
    let mut queue = TrainingQueue::new(10);

    let out = session(&mut engine, &mut queue, "猫\n\nnever read\n").await;
    assert!(out.contains("proto:What> 猫ってなに？"));
    assert!(!out.contains("never read"));
    assert_eq!(engine.dictionary().random(), ["猫"]);
}

#[tokio::test]
async fn empty_dictionary_is_reported_and_loop_continues() {
    let dir = TempDir::new().unwrap();
    let table = WeightTable::new(vec![Weighted { responder: Box::new(RandomResponder), weight: 1 }]).unwrap();
    let mut engine = engine_in(&dir).with_table(table);
    let mut queue = TrainingQueue::new(10);

    let out = session(&mut engine, &mut queue, "こんにちは\nこんにちは\n").await;
    assert!(out.contains("警告: 辞書が空です。(Responder: Random)"));
    // Second turn answers from what the first one learned.
    assert!(out.contains("proto:Random> こんにちは"));
}

#[tokio::test]
async fn train_command_replays_corpus() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("corpus.txt");
    std::fs::write(&corpus, "わたしはケーキが食べたいです\n機械学習を勉強しています\n").unwrap();

    let mut engine = engine_in(&dir);
    let mut queue = TrainingQueue::new(10);
    let input = format!(":train {}\n", corpus.display());

    let out = session(&mut engine, &mut queue, &input).await;
    assert!(out.contains("queued 2 lines for training"));
    assert!(out.contains("training: わたしはケーキが食べたいです"));
    assert!(out.contains("training is done"));
    assert!(queue.is_empty());
    assert_eq!(
        engine.dictionary().random(),
        ["わたしはケーキが食べたいです", "機械学習を勉強しています"]
    );
}

#[tokio::test]
async fn learned_data_survives_restart() {
    let dir = TempDir::new().unwrap();
    let mut queue = TrainingQueue::new(10);
    {
        let mut engine = engine_in(&dir);
        session(&mut engine, &mut queue, "猫が魚を食べた\n:save\n").await;
    }

    let engine = engine_in(&dir);
    assert_eq!(engine.dictionary().random(), ["猫が魚を食べた"]);
    assert!(engine.dictionary().patterns().iter().any(|p| p.keyword == "猫"));
    assert_eq!(engine.dictionary().templates_for(3).unwrap(), ["%noun%が%noun%を%noun%べた"]);
}

#[tokio::test]
async fn cancelled_console_exits() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    let mut queue = TrainingQueue::new(10);
    let token = CancellationToken::new();
    token.cancel();

    let mut out = Vec::new();
    console::run(&mut engine, &mut queue, "猫\n".as_bytes(), &mut out, token).await.unwrap();
    assert!(engine.dictionary().random().is_empty());
}

#[tokio::test]
async fn corpus_lines_are_learned_verbatim() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("corpus.txt");
    std::fs::write(&corpus, ":おはよう\n:save\n猫\n").unwrap();

    let mut engine = engine_in(&dir);
    let mut queue = TrainingQueue::new(10);
    let input = format!(":train {}\n", corpus.display());

    let out = session(&mut engine, &mut queue, &input).await;
    assert!(out.contains("queued 3 lines for training"));
    assert!(!out.contains("unknown command"));
    assert!(!out.contains("saved"));
    assert_eq!(engine.dictionary().random(), [":おはよう", ":save", "猫"]);
}

#[tokio::test]
async fn self_referencing_corpus_terminates() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("corpus.txt");
    let train = format!(":train {}", corpus.display());
    std::fs::write(&corpus, format!("{train}\n")).unwrap();

    let mut engine = engine_in(&dir);
    let mut queue = TrainingQueue::new(10);
    let out = session(&mut engine, &mut queue, &format!("{train}\n")).await;

    assert!(out.contains("queued 1 lines for training"));
    assert!(out.contains("training is done"));
    assert!(queue.is_empty());
    assert_eq!(engine.dictionary().random(), [train.as_str()]);
}

#[tokio::test]
async fn cancel_stops_training_replay() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("corpus.txt");
    std::fs::write(&corpus, "猫\n犬\n魚\n").unwrap();

    let mut engine = engine_in(&dir);
    let mut queue = TrainingQueue::new(10);
    queue.load_file(&corpus).unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let mut out = Vec::new();
    console::run(&mut engine, &mut queue, "".as_bytes(), &mut out, token).await.unwrap();
    assert!(engine.dictionary().random().is_empty());
    assert!(!String::from_utf8(out).unwrap().contains("training is done"));
}

#[tokio::test]
async fn blank_line_does_not_end_session() {
    let dir = TempDir::new().unwrap();
    let table = WeightTable::new(vec![Weighted { responder: Box::new(WhatResponder), weight: 1 }]).unwrap();
    let mut engine = engine_in(&dir).with_table(table);
    let mut queue = TrainingQueue::new(10);

    let out = session(&mut engine, &mut queue, "   \n\t\n猫\n").await;
    assert!(out.contains("proto:What> 猫ってなに？"));
    assert_eq!(engine.dictionary().random(), ["猫"]);
}
