//! Order domain shared by the demo presenters.

use podium::service::ObservedState;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub unit_price: f64,
}

impl Product {
    pub fn new(name: &str, unit_price: f64) -> Self {
        Self {
            name: name.to_string(),
            unit_price,
        }
    }
}

/// The demo's fixed catalog.
pub fn catalog() -> Vec<Product> {
    vec![
        Product::new("Pour-Over Kettle", 29.99),
        Product::new("Burr Grinder", 99.99),
        Product::new("Espresso Machine", 449.00),
        Product::new("Tasting Cup Set", 18.50),
    ]
}

#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product: Product,
    pub quantity: u32,
}

impl OrderLine {
    pub fn subtotal(&self) -> f64 {
        self.product.unit_price * self.quantity as f64
    }
}

/// Order state shared by the catalog and summary presenters.
///
/// Both presenters hold a clone; mutations go through the observed cell so
/// every change notification fires after the internal lock is released.
#[derive(Clone)]
pub struct OrderService {
    lines: ObservedState<Vec<OrderLine>>,
}

impl OrderService {
    pub fn new() -> Self {
        Self {
            lines: ObservedState::new(Vec::new()),
        }
    }

    pub fn lines(&self) -> Vec<OrderLine> {
        self.lines.get()
    }

    /// Add `quantity` of `product`, merging into an existing line for the
    /// same product.
    pub fn add(&self, product: Product, quantity: u32) {
        self.lines.update(|lines| {
            match lines.iter_mut().find(|l| l.product == product) {
                Some(line) => line.quantity += quantity,
                None => lines.push(OrderLine { product, quantity }),
            }
        });
    }

    /// Remove the line at `index`, returning it. Out-of-range is a no-op.
    pub fn remove_at(&self, index: usize) -> Option<OrderLine> {
        self.lines.update(|lines| {
            if index < lines.len() {
                Some(lines.remove(index))
            } else {
                None
            }
        })
    }

    pub fn total(&self) -> f64 {
        self.lines
            .read(|lines| lines.iter().map(OrderLine::subtotal).sum())
    }
}

// -- Bus messages -------------------------------------------------------------

/// Event: a product was added to the order.
pub struct ProductAdded {
    pub product: Product,
    pub quantity: u32,
}

/// Request: whoever owns the order fills in the running total.
pub struct OrderTotalRequest {
    pub total: Option<f64>,
}

impl OrderTotalRequest {
    pub fn new() -> Self {
        Self { total: None }
    }
}
