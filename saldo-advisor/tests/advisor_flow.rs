use chrono::NaiveDate;
use saldo_advisor::{AdviceError, AdviceResponse, Advisor, CannedGateway, GatewayError};
use saldo_core::{demo_transactions, NewTransaction, TransactionKind, TransactionStore};

const GOALS: &str = "Quero quitar dívidas e começar a investir para a aposentadoria.";

fn canned_advice() -> AdviceResponse {
    AdviceResponse {
        analysis: "Moradia consome a maior parte das despesas.".to_string(),
        suggestions: vec![
            "Reduza gastos com lazer.".to_string(),
            "Automatize uma transferência mensal para investimentos.".to_string(),
        ],
    }
}

#[tokio::test]
async fn test_advice_uses_full_store_snapshot() {
    let store = TransactionStore::with_transactions(demo_transactions());
    let advisor = Advisor::new(CannedGateway::replying(canned_advice()));

    let advice = advisor.advise(store.list(), GOALS).await.unwrap();
    assert_eq!(advice, canned_advice());
    // suggestion order is preserved
    assert_eq!(advice.suggestions[0], "Reduza gastos com lazer.");

    let gw = advisor.gateway();
    assert_eq!(gw.calls(), 1);
    let sent = gw.last_request().unwrap();
    assert_eq!(sent.income, 5750.0);
    assert_eq!(sent.expenses.len(), 4);
    assert_eq!(sent.time_period, "mensal");
    assert_eq!(sent.goals, GOALS);
}

#[tokio::test]
async fn test_zero_income_never_reaches_gateway() {
    let mut store = TransactionStore::new();
    let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
    store.add(NewTransaction::new(TransactionKind::Expense, 800.0, "Moradia", date));

    let advisor = Advisor::new(CannedGateway::replying(canned_advice()));
    let err = advisor.advise(store.list(), GOALS).await.unwrap_err();

    assert_eq!(err, AdviceError::InsufficientData);
    assert_eq!(advisor.gateway().calls(), 0);
}

#[tokio::test]
async fn test_empty_store_never_reaches_gateway() {
    let advisor = Advisor::new(CannedGateway::replying(canned_advice()));
    let err = advisor.advise(&[], GOALS).await.unwrap_err();
    assert_eq!(err, AdviceError::InsufficientData);
    assert_eq!(advisor.gateway().calls(), 0);
}

#[tokio::test]
async fn test_short_goals_never_reach_gateway() {
    let advisor = Advisor::new(CannedGateway::replying(canned_advice()));
    let err = advisor.advise(&demo_transactions(), "casa").await.unwrap_err();
    assert!(matches!(err, AdviceError::GoalsTooShort { .. }));
    assert_eq!(advisor.gateway().calls(), 0);
}

#[tokio::test]
async fn test_gateway_failure_is_surfaced_and_store_stays_usable() {
    let mut store = TransactionStore::with_transactions(demo_transactions());
    let advisor = Advisor::new(CannedGateway::failing(GatewayError::Timeout))
        .with_time_period("anual");

    let err = advisor.advise(&store.list().to_vec(), GOALS).await.unwrap_err();
    assert_eq!(err, AdviceError::Gateway(GatewayError::Timeout));
    assert!(err.is_retryable());
    assert_eq!(advisor.gateway().calls(), 1);
    assert_eq!(advisor.gateway().last_request().unwrap().time_period, "anual");

    let date = NaiveDate::from_ymd_opt(2024, 5, 30).unwrap();
    store.add(NewTransaction::new(TransactionKind::Expense, 45.0, "Saúde", date));
    assert_eq!(store.len(), 7);
}

#[tokio::test]
async fn test_malformed_response_is_a_gateway_failure() {
    let advisor = Advisor::new(CannedGateway::failing(GatewayError::MalformedResponse(
        "no JSON object in model output".to_string(),
    )));
    let err = advisor.advise(&demo_transactions(), GOALS).await.unwrap_err();
    assert!(matches!(err, AdviceError::Gateway(GatewayError::MalformedResponse(_))));
    assert_eq!(
        err.user_notice(),
        "Could not reach the advice service. Please try again later."
    );
}

#[tokio::test]
async fn test_prepared_request_ignores_later_mutations() {
    let mut store = TransactionStore::with_transactions(demo_transactions());
    let advisor = Advisor::new(CannedGateway::replying(canned_advice()));

    let request = advisor.prepare(store.list(), GOALS).unwrap();
    assert_eq!(advisor.gateway().calls(), 0);

    let date = NaiveDate::from_ymd_opt(2024, 5, 30).unwrap();
    store.add(NewTransaction::new(TransactionKind::Expense, 45.0, "Saúde", date));

    let advice = advisor.submit(request).await.unwrap();
    assert_eq!(advice, canned_advice());
    assert_eq!(advisor.gateway().last_request().unwrap().expenses.len(), 4);
    assert_eq!(store.len(), 7);
}
