// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for the scan pipeline against mock providers

mod helpers;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bigdecimal::BigDecimal;
use helpers::{fixture_chain, tx, FailingRates, MockChain, MockRates, TX_A, TX_B, TX_C, TX_D};
use txfilter::{
    BlockRangeError, ChainDataProvider, Column, Currency, ExchangeRate, ExchangeRateSource,
    FilterCriterion, ProviderError, RateRefresh, RequestedBlock, ScanConfig, ScanConfigBuilder,
    ScanError, ScanPipeline, TransactionEnricher,
};

const FROM: &str = "0x1111111111111111111111111111111111111111";
const TO: &str = "0x2222222222222222222222222222222222222222";

fn config(output: PathBuf) -> ScanConfigBuilder {
    ScanConfigBuilder::with_defaults()
        .filter(FilterCriterion::new(BigDecimal::from(1), Currency::Eth))
        .num_blocks(2)
        .output(output)
}

#[tokio::test]
async fn test_writes_hand_computed_rows() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.csv");
    let pipeline = ScanPipeline::new(
        config(path.clone()).build()?,
        fixture_chain(),
        MockRates::fixed("2000.0"),
    );

    let report = pipeline.run().await?;
    assert_eq!(report.current_height, 100);
    assert_eq!((report.range.start(), report.range.end()), (99, 100));
    assert_eq!(report.transactions_scanned, 4);
    assert_eq!(report.records_written, 2);
    assert_eq!(report.output_path, path);

    let content = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Block number,hash,from,to,Value (ETH),Value (USD),Gas price (Gwei),Gas price (USD),Transaction fee (ETH),Transaction fee (USD)".to_string(),
            format!("99,{TX_A},{FROM},{TO},2,4000,20,0.00004,0.00042,0.84"),
            format!("100,{TX_C},{FROM},{TO},1,2000,30,0.00006,0.0015,3"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_excluded_transactions_trigger_no_receipt_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let chain = Arc::new(fixture_chain());
    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv")).build().unwrap(),
        chain.clone(),
        MockRates::fixed("2000.0"),
    );

    let outcome = pipeline.collect().await.unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.records.iter().all(|r| r.fee.is_some()));
    assert_eq!(chain.receipt_calls(), vec![TX_A.to_string(), TX_C.to_string()]);
    assert!(!chain.receipt_calls().iter().any(|h| h == TX_B || h == TX_D));
}

#[tokio::test]
async fn test_usd_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv"))
            .filter(FilterCriterion::new(BigDecimal::from(3000), Currency::Usd))
            .build()
            .unwrap(),
        fixture_chain(),
        MockRates::fixed("2000.0"),
    );

    let outcome = pipeline.collect().await.unwrap();
    let hashes: Vec<&str> = outcome.records.iter().map(|r| r.hash()).collect();
    assert_eq!(hashes, vec![TX_A]);
}

#[tokio::test]
async fn test_usd_threshold_is_inclusive() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv"))
            .filter(FilterCriterion::new(BigDecimal::from(2000), Currency::Usd))
            .build()
            .unwrap(),
        fixture_chain(),
        MockRates::fixed("2000.0"),
    );

    let outcome = pipeline.collect().await.unwrap();
    let hashes: Vec<&str> = outcome.records.iter().map(|r| r.hash()).collect();
    assert_eq!(hashes, vec![TX_A, TX_C]);
}

#[tokio::test]
async fn test_failing_receipt_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let pipeline = ScanPipeline::new(
        config(path.clone()).build().unwrap(),
        fixture_chain().with_failing_receipt(TX_C),
        MockRates::fixed("2000.0"),
    );

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(
        err,
        ScanError::Provider(ProviderError::Api { .. })
    ));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_failing_rate_aborts_before_any_block_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let chain = Arc::new(fixture_chain());
    let rates = Arc::new(FailingRates::default());
    let pipeline = ScanPipeline::new(config(path.clone()).build().unwrap(), chain.clone(), rates.clone());

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(
        err,
        ScanError::Provider(ProviderError::Api { ref operation, .. }) if operation == "ethprice"
    ));
    assert!(!path.exists());
    assert_eq!(chain.block_calls(), 0);
    assert!(chain.receipt_calls().is_empty());
    assert_eq!(rates.calls(), 1);
}

#[tokio::test]
async fn test_failing_height_aborts_before_any_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let chain = Arc::new(fixture_chain().with_failing_height());
    let rates = Arc::new(MockRates::fixed("2000"));
    let pipeline = ScanPipeline::new(config(path.clone()).build().unwrap(), chain.clone(), rates.clone());

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(
        err,
        ScanError::Provider(ProviderError::Transport { .. })
    ));
    assert!(!path.exists());
    assert_eq!(chain.block_calls(), 0);
    assert_eq!(rates.calls(), 0);
}

#[tokio::test]
async fn test_failing_block_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let chain = Arc::new(fixture_chain().with_failing_block(100));
    let pipeline = ScanPipeline::new(
        config(path.clone()).build().unwrap(),
        chain.clone(),
        MockRates::fixed("2000"),
    );

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(
        err,
        ScanError::Provider(ProviderError::Api { ref operation, .. }) if operation == "eth_getBlockByNumber"
    ));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_rejected_transaction_with_unreadable_block_number_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut pending = tx(TX_B, "0x6f05b59d3b20000", "0x1", 5);
    pending.block_number = "pending".to_string();
    let chain = MockChain::new(5)
        .with_block(5, vec![pending, tx(TX_A, "0x1bc16d674ec80000", "0x1", 5)])
        .with_receipt(TX_A, "0x5208");
    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv")).num_blocks(1).build().unwrap(),
        chain,
        MockRates::fixed("2000"),
    );

    let outcome = pipeline.collect().await.unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].block_number, 5);
}

#[tokio::test]
async fn test_missing_receipt_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let chain = MockChain::new(5).with_block(5, vec![tx(TX_A, "0x1bc16d674ec80000", "0x1", 5)]);
    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv")).num_blocks(1).build().unwrap(),
        chain,
        MockRates::fixed("2000"),
    );

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(
        err,
        ScanError::Provider(ProviderError::ReceiptNotFound { .. })
    ));
}

#[tokio::test]
async fn test_block_beyond_head_is_rejected_before_any_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let chain = Arc::new(fixture_chain());
    let rates = Arc::new(MockRates::fixed("2000"));
    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv"))
            .last_block(RequestedBlock::Number(101))
            .build()
            .unwrap(),
        chain.clone(),
        rates.clone(),
    );

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(
        err,
        ScanError::Range(BlockRangeError::BeyondChainHead {
            requested: 101,
            current: 100
        })
    ));
    assert_eq!(chain.block_calls(), 0);
    assert_eq!(rates.calls(), 0);
}

#[tokio::test]
async fn test_range_before_genesis_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv"))
            .last_block(RequestedBlock::Number(3))
            .num_blocks(5)
            .build()
            .unwrap(),
        fixture_chain(),
        MockRates::fixed("2000"),
    );

    let err = pipeline.collect().await.unwrap_err();
    assert!(matches!(
        err,
        ScanError::Range(BlockRangeError::BeforeGenesis { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_walk_preserves_order() {
    let dir = tempfile::tempdir().unwrap();
    // Earlier blocks answer later, so completion order is the reverse of block order
    let mut chain = MockChain::new(100);
    for height in 96..=100u64 {
        let hash = format!("0x{height:064x}");
        chain = chain
            .with_block(
                height,
                vec![
                    tx(&hash, "0xde0b6b3a7640000", "0x3b9aca00", height),
                    tx(&format!("0x{:064x}", height + 1000), "0x1", "0x1", height),
                ],
            )
            .with_receipt(&hash, "0x5208")
            .with_block_delay(height, Duration::from_millis((101 - height) * 20));
    }

    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv"))
            .num_blocks(5)
            .max_concurrent_blocks(5)
            .max_concurrent_receipts(4)
            .build()
            .unwrap(),
        chain,
        MockRates::fixed("2000"),
    );

    let outcome = pipeline.collect().await.unwrap();
    let blocks: Vec<u64> = outcome.records.iter().map(|r| r.block_number).collect();
    assert_eq!(blocks, vec![96, 97, 98, 99, 100]);
    assert_eq!(outcome.transactions_scanned, 10);
}

#[tokio::test]
async fn test_rate_fetched_once_per_run_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let rates = Arc::new(MockRates::fixed("2000"));
    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv")).build().unwrap(),
        fixture_chain(),
        rates.clone(),
    );

    let outcome = pipeline.collect().await.unwrap();
    assert_eq!(rates.calls(), 1);
    assert_eq!(outcome.rate_groups.len(), 1);
}

#[tokio::test]
async fn test_rate_refreshed_per_group() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut chain = MockChain::new(10);
    for height in 5..=10u64 {
        let hash = format!("0x{height:064x}");
        chain = chain
            .with_block(height, vec![tx(&hash, "0xde0b6b3a7640000", "0x1", height)])
            .with_receipt(&hash, "0x5208");
    }
    let rates = Arc::new(MockRates::sequence(&["1000", "2000", "3000"]));

    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv"))
            .num_blocks(6)
            .rate_refresh(RateRefresh::EveryBlocks(2))
            .build()?,
        chain,
        rates.clone(),
    );

    let outcome = pipeline.collect().await?;
    assert_eq!(rates.calls(), 3);

    let usd: Vec<BigDecimal> = outcome.records.iter().map(|r| r.value_usd.clone()).collect();
    let expected: Vec<BigDecimal> = [1000, 1000, 2000, 2000, 3000, 3000]
        .into_iter()
        .map(BigDecimal::from)
        .collect();
    assert_eq!(usd, expected);

    let groups: Vec<(u64, u64)> = outcome
        .rate_groups
        .iter()
        .map(|g| (g.range.start(), g.range.end()))
        .collect();
    assert_eq!(groups, vec![(5, 6), (7, 8), (9, 10)]);
    Ok(())
}

#[tokio::test]
async fn test_no_matches_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let pipeline = ScanPipeline::new(
        config(path.clone())
            .filter(FilterCriterion::new(BigDecimal::from(1_000_000), Currency::Eth))
            .build()
            .unwrap(),
        fixture_chain(),
        MockRates::fixed("2000"),
    );

    let report = pipeline.run().await.unwrap();
    assert_eq!(report.records_written, 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
}

#[tokio::test]
async fn test_selected_columns_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let pipeline = ScanPipeline::new(
        config(path.clone())
            .columns(vec![Column::BlockNumber, Column::FeeUsd])
            .build()
            .unwrap(),
        fixture_chain(),
        MockRates::fixed("2000"),
    );

    pipeline.run().await.unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec!["Block number,Transaction fee (USD)", "99,0.84", "100,3"]
    );
}

#[tokio::test]
async fn test_invalid_config_makes_no_remote_call() {
    let chain = Arc::new(fixture_chain());
    let config = ScanConfig {
        num_blocks: 0,
        ..ScanConfig::default()
    };
    let pipeline = ScanPipeline::new(config, chain.clone(), MockRates::fixed("2000"));

    let err = pipeline.collect().await.unwrap_err();
    assert!(matches!(err, ScanError::Config(_)));
    assert_eq!(chain.block_calls(), 0);
}

#[tokio::test]
async fn test_type_erased_providers() {
    let dir = tempfile::tempdir().unwrap();
    let chain: Arc<dyn ChainDataProvider> = Arc::new(fixture_chain());
    let rates: Box<dyn ExchangeRateSource> = Box::new(MockRates::fixed("2000"));
    let pipeline = ScanPipeline::new(
        config(dir.path().join("out.csv")).build().unwrap(),
        chain,
        rates,
    );

    assert_eq!(pipeline.collect().await.unwrap().records.len(), 2);
}

#[tokio::test]
async fn test_enrich_single_transaction() {
    let chain = fixture_chain();
    let rate = ExchangeRate::parse("2000.0").unwrap();
    let enricher = TransactionEnricher::new(FilterCriterion::default());

    let rejected = enricher
        .enrich(tx(TX_B, "0x6f05b59d3b20000", "0x4a817c800", 99), &rate, &chain)
        .await
        .unwrap();
    assert!(rejected.is_none());
    assert!(chain.receipt_calls().is_empty());

    let accepted = enricher
        .enrich(tx(TX_A, "0x1bc16d674ec80000", "0x4a817c800", 99), &rate, &chain)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accepted.block_number, 99);
    assert_eq!(
        accepted.fee.unwrap().fee_eth,
        "0.00042".parse::<BigDecimal>().unwrap()
    );
    assert_eq!(chain.receipt_calls(), vec![TX_A.to_string()]);
}
