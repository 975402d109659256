//! Views and presenters for the order entry demo.
//!
//! Three sibling presenters share one [`OrderService`] and one [`EventBus`]:
//! the catalog publishes `ProductAdded`, the summary reacts and answers
//! total requests, and the status line narrates — none of them holds a
//! reference to another.

use std::sync::Arc;

use parking_lot::Mutex;

use podium::action::{ActionBinder, ActionDispatcher, ActionId};
use podium::bus::{EventBus, Subscription};
use podium::presenter::Presenter;
use podium::view::View;
use podium::widget::Button;

use crate::domain::{OrderLine, OrderService, OrderTotalRequest, Product, ProductAdded};

pub fn add_to_order() -> ActionId {
    ActionId::new("Catalog", "AddToOrder")
}

pub fn remove_item() -> ActionId {
    ActionId::new("OrderSummary", "RemoveItem")
}

// -- Catalog ------------------------------------------------------------------

pub struct CatalogView {
    binder: ActionBinder,
    add_button: Arc<Button>,
    products: Vec<Product>,
    selected: Mutex<usize>,
}

impl CatalogView {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            binder: ActionBinder::new(),
            add_button: Arc::new(Button::new("Add to order")),
            products,
            selected: Mutex::new(0),
        }
    }

    pub fn add_button(&self) -> Arc<Button> {
        Arc::clone(&self.add_button)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn selected(&self) -> usize {
        *self.selected.lock()
    }

    pub fn selected_product(&self) -> Product {
        self.products[self.selected()].clone()
    }

    pub fn select_next(&self) {
        let mut selected = self.selected.lock();
        *selected = (*selected + 1) % self.products.len();
    }

    pub fn select_prev(&self) {
        let mut selected = self.selected.lock();
        *selected = selected.checked_sub(1).unwrap_or(self.products.len() - 1);
    }
}

impl View for CatalogView {
    fn binder(&self) -> &ActionBinder {
        &self.binder
    }
}

pub struct CatalogPresenter {
    orders: OrderService,
    bus: EventBus,
}

impl CatalogPresenter {
    pub fn new(orders: OrderService, bus: EventBus) -> Self {
        Self { orders, bus }
    }
}

impl Presenter for CatalogPresenter {
    type View = CatalogView;

    fn register_actions(&mut self, view: &Arc<CatalogView>, dispatcher: &ActionDispatcher) {
        view.binder()
            .add(add_to_order(), view.add_button())
            .expect("catalog bindings are added before bind");

        let orders = self.orders.clone();
        let bus = self.bus.clone();
        let view = Arc::clone(view);
        dispatcher.register(add_to_order(), move || {
            let product = view.selected_product();
            orders.add(product.clone(), 1);
            tracing::debug!(product = %product.name, "added to order");
            let mut added = ProductAdded {
                product,
                quantity: 1,
            };
            bus.publish(&mut added);
            Ok(())
        });
    }
}

// -- Summary ------------------------------------------------------------------

pub struct SummaryView {
    binder: ActionBinder,
    remove_button: Arc<Button>,
    lines: Mutex<Vec<OrderLine>>,
    selected: Mutex<Option<usize>>,
}

impl SummaryView {
    pub fn new() -> Self {
        Self {
            binder: ActionBinder::new(),
            remove_button: Arc::new(Button::new("Remove item")),
            lines: Mutex::new(Vec::new()),
            selected: Mutex::new(None),
        }
    }

    pub fn remove_button(&self) -> Arc<Button> {
        Arc::clone(&self.remove_button)
    }

    pub fn lines(&self) -> Vec<OrderLine> {
        self.lines.lock().clone()
    }

    /// Replace the displayed rows, clamping the selection to the new bounds.
    pub fn set_lines(&self, lines: Vec<OrderLine>) {
        let len = lines.len();
        *self.lines.lock() = lines;
        let mut selected = self.selected.lock();
        *selected = match (*selected, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(index), len) => Some(index.min(len - 1)),
        };
    }

    pub fn selected(&self) -> Option<usize> {
        *self.selected.lock()
    }

    pub fn select_next(&self) {
        let len = self.lines.lock().len();
        let mut selected = self.selected.lock();
        if len > 0 {
            *selected = Some(selected.map_or(0, |index| (index + 1) % len));
        }
    }

    pub fn select_prev(&self) {
        let len = self.lines.lock().len();
        let mut selected = self.selected.lock();
        if len > 0 {
            *selected = Some(
                selected.map_or(0, |index| index.checked_sub(1).unwrap_or(len - 1)),
            );
        }
    }
}

impl View for SummaryView {
    fn binder(&self) -> &ActionBinder {
        &self.binder
    }
}

pub struct SummaryPresenter {
    orders: OrderService,
    bus: EventBus,
    refresh: Option<Subscription>,
    total_requests: Option<Subscription>,
}

impl SummaryPresenter {
    pub fn new(orders: OrderService, bus: EventBus) -> Self {
        Self {
            orders,
            bus,
            refresh: None,
            total_requests: None,
        }
    }
}

impl Presenter for SummaryPresenter {
    type View = SummaryView;

    fn register_actions(&mut self, view: &Arc<SummaryView>, dispatcher: &ActionDispatcher) {
        view.binder()
            .add(remove_item(), view.remove_button())
            .expect("summary bindings are added before bind");

        let orders = self.orders.clone();
        let handler_view = Arc::clone(view);
        let handler_dispatcher = dispatcher.clone();
        let guard_view = Arc::clone(view);
        dispatcher.register_guarded(
            remove_item(),
            move || {
                if let Some(index) = handler_view.selected() {
                    if let Some(line) = orders.remove_at(index) {
                        tracing::debug!(product = %line.product.name, "removed from order");
                    }
                    handler_view.set_lines(orders.lines());
                    handler_dispatcher.raise_can_execute_changed();
                }
                Ok(())
            },
            move || guard_view.selected().is_some(),
        );

        let refresh_view = Arc::clone(view);
        let refresh_orders = self.orders.clone();
        let refresh_dispatcher = dispatcher.clone();
        self.refresh = Some(self.bus.subscribe::<ProductAdded, _>(move |_| {
            refresh_view.set_lines(refresh_orders.lines());
            refresh_dispatcher.raise_can_execute_changed();
        }));

        let total_orders = self.orders.clone();
        self.total_requests = Some(self.bus.subscribe::<OrderTotalRequest, _>(move |request| {
            request.total = Some(total_orders.total());
        }));
    }

    fn on_initialize(&mut self, view: &Arc<SummaryView>) {
        view.set_lines(self.orders.lines());
    }

    fn on_dispose(&mut self) {
        self.refresh = None;
        self.total_requests = None;
    }
}

// -- Status line --------------------------------------------------------------

pub struct StatusView {
    binder: ActionBinder,
    text: Mutex<String>,
}

impl StatusView {
    pub fn new() -> Self {
        Self {
            binder: ActionBinder::new(),
            text: Mutex::new("Ready.".to_string()),
        }
    }

    pub fn text(&self) -> String {
        self.text.lock().clone()
    }

    pub fn set_text(&self, text: String) {
        *self.text.lock() = text;
    }
}

impl View for StatusView {
    fn binder(&self) -> &ActionBinder {
        &self.binder
    }
}

pub struct StatusPresenter {
    bus: EventBus,
    announcements: Option<Subscription>,
}

impl StatusPresenter {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            announcements: None,
        }
    }
}

impl Presenter for StatusPresenter {
    type View = StatusView;

    fn register_actions(&mut self, view: &Arc<StatusView>, _dispatcher: &ActionDispatcher) {
        let bus = self.bus.clone();
        let view = Arc::clone(view);
        self.announcements = Some(self.bus.subscribe::<ProductAdded, _>(move |added| {
            // Nested publish: the total request completes before this
            // handler returns to the outer delivery loop.
            let mut request = OrderTotalRequest::new();
            bus.publish(&mut request);
            let total = request.total.unwrap_or(0.0);
            view.set_text(format!(
                "Added {}x {} to order. Total ${total:.2}",
                added.quantity, added.product.name
            ));
        }));
    }

    fn on_dispose(&mut self) {
        self.announcements = None;
    }
}
