//! # Validation Module
//!
//! Input validation for catalog, sale, and purchase-order entry.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Entry form                                                   │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before any insert)                              │
//! │  └── Business rule validation                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{NewOrder, NewProduct, NewSale, OrderLine, SaleLine};
use crate::{MAX_LINE_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an optional SKU.
///
/// ## Rules
/// - Absent is fine (the catalog does not require SKUs)
/// - When present: non-empty, at most 50 characters, alphanumeric plus
///   hyphens and underscores
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a category label.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount (price, cost, total).
///
/// ## Rules
/// - Must be a finite number (no NaN, no infinities)
/// - Must be non-negative; zero is allowed (free items, promotional sales)
pub fn validate_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::MustBeFinite {
            field: field.to_string(),
        });
    }

    if amount < 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an on-hand stock level.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (out of stock)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a product before insertion into the catalog.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_amount("price", product.price)?;
    validate_stock(product.stock)?;

    if let Some(sku) = &product.sku {
        validate_sku(sku)?;
    }

    Ok(())
}

fn validate_sale_line(line: &SaleLine) -> ValidationResult<()> {
    validate_product_name(line.product.name())?;
    validate_quantity(line.quantity)?;
    validate_amount("sale_price", line.sale_price)?;
    Ok(())
}

fn validate_order_line(line: &OrderLine) -> ValidationResult<()> {
    validate_product_name(line.product.name())?;
    validate_quantity(line.quantity)?;
    validate_amount("unit_cost", line.unit_cost)?;
    Ok(())
}

/// Validates a sale and its lines before insertion.
///
/// ## Rules
/// - Stored totals must be finite and non-negative (`gain` may be zero but
///   not negative: loss-making sales are recorded with gain 0 by the form)
/// - At least one line, at most [`MAX_SALE_LINES`]
/// - Every line must have a name, a positive quantity, and a valid price
pub fn validate_new_sale(sale: &NewSale) -> ValidationResult<()> {
    validate_amount("total_amount", sale.total_amount)?;
    validate_amount("gain", sale.gain)?;

    if sale.lines.is_empty() || sale.lines.len() > MAX_SALE_LINES {
        return Err(ValidationError::BadCollectionSize {
            field: "lines".to_string(),
            min: 1,
            max: MAX_SALE_LINES,
        });
    }

    for line in &sale.lines {
        validate_sale_line(line)?;
    }

    Ok(())
}

/// Validates a purchase order and its lines before insertion.
pub fn validate_new_order(order: &NewOrder) -> ValidationResult<()> {
    validate_amount("total_amount", order.total_amount)?;

    if order.lines.is_empty() || order.lines.len() > MAX_SALE_LINES {
        return Err(ValidationError::BadCollectionSize {
            field: "lines".to_string(),
            min: 1,
            max: MAX_SALE_LINES,
        });
    }

    for line in &order.lines {
        validate_order_line(line)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
