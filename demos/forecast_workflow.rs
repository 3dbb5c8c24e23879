use dotenv::dotenv;
use sme_finance_assistant::llm::{FinancialAnalyst, ForecastClient, DEFAULT_FORECAST_PERIODS};
use sme_finance_assistant::{
    sample_csv, AssistantConfig, DatasetWorkspace, UploadedFile, SAMPLE_FILE_NAME,
};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let config = AssistantConfig::from_env();

    let periods = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_FORECAST_PERIODS);

    // Start from the downloadable sample, exactly as a user would upload it.
    let upload = UploadedFile::new(SAMPLE_FILE_NAME, Some("text/csv"), sample_csv()?);
    let mut workspace = DatasetWorkspace::new();
    workspace.load_upload(&upload)?;
    println!("📂 Loaded {} months from {}", workspace.dataset().len(), SAMPLE_FILE_NAME);

    let forecaster = ForecastClient::from_config(&config)?;
    let revision = workspace.revision();
    let points = forecaster.forecast(workspace.dataset(), periods).await?;
    workspace.record_forecast(revision, points);

    println!("\n🔮 Forecast ({} periods)", workspace.forecast().len());
    for point in workspace.forecast() {
        println!(
            "  {:<10} revenue {:>12.0}  expenses {:>12.0}  profit {:>12.0}",
            point.month,
            point.revenue,
            point.expenses,
            point.profit()
        );
    }

    let analyst = FinancialAnalyst::from_config(&config)?;
    let outcome = analyst.review_forecast(workspace.forecast()).await;
    match outcome {
        Ok(review) => {
            workspace.record_forecast_analysis(revision, review);
        }
        Err(e) => println!("\n⚠️  {}", e),
    }

    if let Some(review) = workspace.forecast_analysis() {
        println!("\n💡 Insights");
        for insight in &review.insights {
            println!("  - {}", insight);
        }
        if let Some(outlook) = &review.future_outlook {
            println!("\n📈 Outlook");
            println!("  Revenue:       {}", outlook.revenue);
            println!("  Expenses:      {}", outlook.expenses);
            println!("  Profitability: {}", outlook.profitability);
            for risk in &outlook.risk_factors {
                println!("  ⚠ {}", risk);
            }
        }
    }

    Ok(())
}
