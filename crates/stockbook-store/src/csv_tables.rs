//! CSV file backend

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{
    PRODUCT_COLUMNS, Product, ProductRow, SALE_COLUMNS, Sale, SaleRow, StoreError, StoreResult,
    Tables,
};

/// Products and sales tables stored as two CSV files
#[derive(Debug, Clone)]
pub struct CsvTables {
    products_path: PathBuf,
    sales_path: PathBuf,
}

impl CsvTables {
    /// Open the tables in `dir`, creating the directory and header-only
    /// files for whichever table does not exist yet.
    pub fn open(dir: impl AsRef<Path>, products_file: &str, sales_file: &str) -> StoreResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let tables = Self {
            products_path: dir.join(products_file),
            sales_path: dir.join(sales_file),
        };
        tables.init_files()?;
        Ok(tables)
    }

    pub fn products_path(&self) -> &Path {
        &self.products_path
    }

    pub fn sales_path(&self) -> &Path {
        &self.sales_path
    }

    fn init_files(&self) -> StoreResult<()> {
        if !self.products_path.exists() {
            write_table::<ProductRow>(&self.products_path, &PRODUCT_COLUMNS, Vec::new())?;
            info!(path = %self.products_path.display(), "Created products table");
        }
        if !self.sales_path.exists() {
            write_table::<SaleRow>(&self.sales_path, &SALE_COLUMNS, Vec::new())?;
            info!(path = %self.sales_path.display(), "Created sales table");
        }
        Ok(())
    }
}

impl Tables for CsvTables {
    fn load_products(&self) -> StoreResult<Vec<Product>> {
        let products = read_table(
            &self.products_path,
            "products",
            &PRODUCT_COLUMNS,
            ProductRow::into_product,
        )?;
        debug!(rows = products.len(), "Products table loaded");
        Ok(products)
    }

    fn save_products(&self, products: &[Product]) -> StoreResult<()> {
        // Converted up front so an unstorable row leaves the file intact
        let rows = products
            .iter()
            .map(ProductRow::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        write_table(&self.products_path, &PRODUCT_COLUMNS, rows)?;
        debug!(rows = products.len(), "Products table saved");
        Ok(())
    }

    fn load_sales(&self) -> StoreResult<Vec<Sale>> {
        let sales = read_table(&self.sales_path, "sales", &SALE_COLUMNS, SaleRow::into_sale)?;
        debug!(rows = sales.len(), "Sales table loaded");
        Ok(sales)
    }

    fn save_sales(&self, sales: &[Sale]) -> StoreResult<()> {
        let rows = sales
            .iter()
            .map(SaleRow::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        write_table(&self.sales_path, &SALE_COLUMNS, rows)?;
        debug!(rows = sales.len(), "Sales table saved");
        Ok(())
    }
}

fn read_table<R, T>(
    path: &Path,
    table: &'static str,
    columns: &[&str],
    convert: impl Fn(R, u64) -> StoreResult<T>,
) -> StoreResult<Vec<T>>
where
    R: DeserializeOwned,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if found != columns {
        return Err(StoreError::SchemaMismatch {
            table,
            expected: columns.iter().map(|c| c.to_string()).collect(),
            found,
        });
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<R>().enumerate() {
        // Line 1 is the header
        let line = index as u64 + 2;
        records.push(convert(row?, line)?);
    }
    Ok(records)
}

fn write_table<R: Serialize>(path: &Path, columns: &[&str], rows: Vec<R>) -> StoreResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(columns)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
