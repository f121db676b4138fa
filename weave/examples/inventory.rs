use std::fs::File;
use std::sync::Arc;

use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use weave::prelude::*;

#[derive(Debug, Clone)]
struct Part {
    sku: String,
    name: String,
    stock: u32,
}

fn parts() -> Vec<Part> {
    [
        ("B-100", "Ball bearing", 420),
        ("B-220", "Bolt M8", 1200),
        ("G-010", "Gasket", 35),
        ("H-330", "Hinge", 80),
        ("N-100", "Nut M8", 1500),
        ("S-450", "Spring", 240),
        ("V-020", "Valve", 12),
        ("W-500", "Washer", 900),
    ]
    .into_iter()
    .map(|(sku, name, stock)| Part {
        sku: sku.to_string(),
        name: name.to_string(),
        stock,
    })
    .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = File::create("inventory.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let config = WeaveConfig::from_json(r#"{ "page_size": 5, "page_size_options": [5, 10] }"#)?;
    let doc = Document::new();
    let store = ComponentStore::new();

    // Navigation
    let nav = NavigationGroup::new(&doc, "Warehouse")
        .add_item("parts", "Parts")
        .add_item("orders", "Orders")
        .on_item_click(|id| info!("Navigate to {id}"))
        .expanded(true);
    doc.append_node(doc.body(), nav.root());
    store.register(nav.root(), nav.clone());

    // Data
    let provider = DataProvider::with_config(|part: &Part| part.sku.clone(), &config);
    provider.on_select(|part| info!("Selected {}", part.name));
    let source: Arc<dyn DataSource<Part>> = Arc::new(provider.clone());

    let toolbar = Toolbar::with_config(&doc, Arc::clone(&source), &config)
        .text_filter(|part: &Part| part.name.clone());
    let table = DataTable::new(&doc, source)
        .selectable()
        .column(Column::text("sku", "SKU", |part: &Part| part.sku.clone()).sortable(|a, b| a.sku.cmp(&b.sku)))
        .column(Column::text("name", "Name", |part: &Part| part.name.clone()).sortable(|a, b| a.name.cmp(&b.name)))
        .column(
            Column::text("stock", "Stock", |part: &Part| part.stock.to_string())
                .sortable(|a, b| a.stock.cmp(&b.stock)),
        );
    doc.append_node(doc.body(), toolbar.root());
    doc.append_node(doc.body(), table.root());
    provider.bind_display(Arc::new(toolbar.clone()));
    provider.bind_display(Arc::new(table.clone()));
    provider.update(parts())?;
    println!("{}", toolbar.pagination().info_text());

    // Sort by stock, highest first
    let stock = table.sort_button("stock").ok_or("missing stock column")?;
    doc.click(stock);
    doc.click(stock);
    let first = provider.visible_items().first().map(|part| part.name.clone());
    println!("Most stocked: {}", first.unwrap_or_default());

    // Filter and select
    toolbar.filter_text("m8");
    provider.select_all();
    println!(
        "{} of {} parts match 'm8', {}",
        provider.page_info().total(),
        provider.all_items().len(),
        toolbar.selected_text()
    );
    toolbar.filter_text("");

    // Page through
    doc.click(toolbar.pagination().next_button());
    println!("{}", toolbar.pagination().info_text());

    let owner = store.find_owner::<NavigationGroup>(&doc, nav.link());
    println!("Navigation registered: {}", owner.is_some());
    Ok(())
}
