use core_config::tracing::{init_tracing, install_color_eyre};
use domain_health_records::{
    HealthRecordFilter, HealthRecordRepository, HealthRecordStore, HealthRecordUpdate,
    NewHealthRecord,
};
use futures_util::TryStreamExt;
use tracing::info;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.url());
    let store = HealthRecordStore::connect(&config.mongodb).await?;

    store
        .insert(
            NewHealthRecord::new(1, 110.5, 72.0)
                .with_activity_level(5000.0)
                .with_food_image_path("/path/to/image1.jpg"),
        )
        .await?;
    println!("Data inserted for user_id 1");

    let inserted = store
        .bulk_insert(vec![
            NewHealthRecord::new(2, 120.3, 75.0)
                .with_activity_level(3000.0)
                .with_food_image_path("/path/to/image2.jpg"),
            NewHealthRecord::new(3, 100.8, 80.0)
                .with_activity_level(7000.0)
                .with_food_image_path("/path/to/image3.jpg"),
        ])
        .await?;
    println!("{inserted} records inserted.");

    println!("All data in the collection:");
    print_records(&store, HealthRecordFilter::all()).await?;

    println!("Data for user_id 1:");
    print_records(&store, HealthRecordFilter::for_user(1)).await?;

    let update = HealthRecordUpdate {
        glucose_level: Some(115.0),
        ..Default::default()
    };
    store.update(1, update.clone()).await?;
    println!(
        "Data for user_id 1 updated with fields: {}",
        update.to_update_document()
    );

    println!("Updated data for user_id 1:");
    print_records(&store, HealthRecordFilter::for_user(1)).await?;

    store.delete(3).await?;
    println!("Data for user_id 3 deleted.");

    println!("All data after deletion:");
    print_records(&store, HealthRecordFilter::all()).await?;

    store.shutdown().await;
    Ok(())
}

/// Print every record matching `filter`, one per line, as the cursor yields them
async fn print_records<R: HealthRecordRepository>(
    store: &HealthRecordStore<R>,
    filter: HealthRecordFilter,
) -> eyre::Result<()> {
    let mut records = store.query(filter).await?;
    while let Some(record) = records.try_next().await? {
        println!("  {record}");
    }
    Ok(())
}
