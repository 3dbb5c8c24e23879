use dotenv::dotenv;
use sme_finance_assistant::llm::FinancialAnalyst;
use sme_finance_assistant::{AssistantConfig, DatasetWorkspace, UploadedFile};
use std::error::Error;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let config = AssistantConfig::from_env();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: analyze_csv <file.csv>")?;

    let mut workspace = DatasetWorkspace::new();
    workspace.load_upload(&UploadedFile::from_path(&path)?)?;

    println!("📊 Loaded {} periods from {}\n", workspace.dataset().len(), path.display());
    println!(
        "{:<10} {:>14} {:>14} {:>14} {:>8}",
        "Month", "Revenue", "Expenses", "Profit", "Margin"
    );
    for record in workspace.dataset() {
        println!(
            "{:<10} {:>14.0} {:>14.0} {:>14.0} {:>7.1}%",
            record.label,
            record.revenue,
            record.expenses,
            record.profit(),
            record.margin()
        );
    }
    println!("\n🩺 Health: {}\n", workspace.health_rating());

    let analyst = FinancialAnalyst::from_config(&config)?;
    let revision = workspace.revision();
    let outcome = analyst.analyze_dataset(workspace.dataset()).await;
    match outcome {
        Ok(analysis) => {
            workspace.record_analysis(revision, analysis);
        }
        Err(e) => println!("⚠️  {}", e),
    }

    if let Some(analysis) = workspace.analysis() {
        println!("💡 Insights");
        for insight in &analysis.insights {
            println!("  - {}", insight);
        }
        println!("\n✅ Recommendations");
        for recommendation in &analysis.recommendations {
            println!("  - {}", recommendation);
        }
    }

    Ok(())
}
