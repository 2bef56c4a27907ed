mod common;

use anyhow::Result;
use common::{parse_date, raw_workbook, test_service};
use duit::application::AppError;
use duit::domain::{Category, ExpenseTransaction, TransactionKind};
use duit::storage::RowStore;

#[tokio::test]
async fn test_record_then_load_round_trip() -> Result<()> {
    let (service, _temp) = test_service()?;

    service
        .record_income(parse_date("2025-06-02"), "Salary", 300000)
        .await?;
    service
        .record_expense(parse_date("2025-06-01"), "Lunch", Category::Food, 1250)
        .await?;

    let (expenses, incomes) = service.transactions().await?;
    assert_eq!(incomes.len(), 1);
    assert_eq!(
        expenses.last(),
        Some(&ExpenseTransaction::new(parse_date("2025-06-01"), "Lunch", Category::Food, 1250)?)
    );
    Ok(())
}

#[tokio::test]
async fn test_record_returns_fresh_positions() -> Result<()> {
    let (service, _temp) = test_service()?;

    for (i, source) in ["Salary", "Freelance", "Interest"].iter().enumerate() {
        let position = service
            .record_income(parse_date("2025-06-02"), source, 1000)
            .await?;
        assert_eq!(position, i);
    }
    Ok(())
}

#[tokio::test]
async fn test_delete_shifts_later_positions_down() -> Result<()> {
    let (service, _temp) = test_service()?;

    for source in ["a", "b", "c"] {
        service
            .record_income(parse_date("2025-06-02"), source, 100)
            .await?;
    }

    service.remove_transaction(TransactionKind::Income, 1).await?;

    let (_, incomes) = service.transactions().await?;
    let sources: Vec<_> = incomes.iter().map(|t| t.source.as_str()).collect();
    assert_eq!(sources, vec!["a", "c"]);
    Ok(())
}

#[tokio::test]
async fn test_repeated_delete_against_fresh_positions() -> Result<()> {
    let (service, _temp) = test_service()?;

    for source in ["a", "b", "c", "d"] {
        service
            .record_income(parse_date("2025-06-02"), source, 100)
            .await?;
    }

    // Delete "b", reload, then delete "d" at its shifted position.
    service.remove_transaction(TransactionKind::Income, 1).await?;
    let (_, incomes) = service.transactions().await?;
    let position = incomes.iter().position(|t| t.source == "d").unwrap();
    service
        .remove_transaction(TransactionKind::Income, position)
        .await?;

    let (_, incomes) = service.transactions().await?;
    let sources: Vec<_> = incomes.iter().map(|t| t.source.as_str()).collect();
    assert_eq!(sources, vec!["a", "c"]);
    Ok(())
}

#[tokio::test]
async fn test_delete_out_of_range_leaves_data_unchanged() -> Result<()> {
    let (service, _temp) = test_service()?;

    service.record_income(parse_date("2025-06-01"), "a", 100).await?;
    service.record_income(parse_date("2025-06-02"), "b", 200).await?;

    let before = service.transactions().await?;

    let err = service
        .remove_transaction(TransactionKind::Income, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::IndexOutOfRange { index: 5, count: 2 }));

    let after = service.transactions().await?;
    assert_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn test_validation_rejects_negative_amount() -> Result<()> {
    let (service, _temp) = test_service()?;

    let err = service
        .record_income(parse_date("2025-06-02"), "Salary", -100)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let (_, incomes) = service.transactions().await?;
    assert!(incomes.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_stored_negative_amount_is_data_integrity() -> Result<()> {
    let (service, temp) = test_service()?;
    service.record_income(parse_date("2025-06-02"), "Salary", 100).await?;

    // A corrupt row written behind the service's back
    let raw = raw_workbook(&temp)?;
    raw.append_row(
        "Income",
        &["2025-06-03".to_string(), "Refund".to_string(), "-5".to_string()],
    )
    .await?;

    let err = service.transactions().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::DataIntegrity { position: 1, .. }
    ));
    Ok(())
}

#[tokio::test]
async fn test_unparsable_date_keeps_its_position() -> Result<()> {
    let (service, temp) = test_service()?;

    let raw = raw_workbook(&temp)?;
    raw.append_row(
        "Income",
        &["someday".to_string(), "Mystery".to_string(), "10.00".to_string()],
    )
    .await?;
    service.record_income(parse_date("2025-06-02"), "Salary", 100).await?;

    let (_, incomes) = service.transactions().await?;
    assert_eq!(incomes.len(), 2);
    assert_eq!(incomes[0].date, None);

    // Deleting position 0 must remove the dateless row, not the salary.
    service.remove_transaction(TransactionKind::Income, 0).await?;
    let (_, incomes) = service.transactions().await?;
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].source, "Salary");
    Ok(())
}
