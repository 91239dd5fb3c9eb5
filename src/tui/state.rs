use crossterm::event::KeyCode;
use grocer_review::access::{NavView, SignedIn};
use grocer_review::analytics::{CorporateView, Mailbox, RegionalView, SpoilageLog, WasteEntry};
use grocer_review::catalog::Catalog;
use grocer_review::engine::{OrderRecommendation, ReviewEngine};
use grocer_review::feed::types::{
    CorporateDashboard, Notification, OrderHistoryEntry, RegionalStorePerformance, SpoilageReason,
    SpoilageRecord,
};
use grocer_review::feed::FetchOutcome;
use grocer_review::session::{BatchLoaded, LoadState, ReviewSession};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

const MAX_LOGS: usize = 200;

/// Work the TUI loop has to do outside the state: fetches and quitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiCommand {
    Quit,
    RefreshBatch,
    Load(NavView),
    LoadRegion(String),
}

/// Fetched data for the non-order views.
#[derive(Debug, Clone)]
pub enum ViewData {
    History(FetchOutcome<Vec<OrderHistoryEntry>>),
    Spoilage(FetchOutcome<Vec<SpoilageRecord>>),
    Notifications(FetchOutcome<Vec<Notification>>),
    Regional {
        region: String,
        outcome: FetchOutcome<Vec<RegionalStorePerformance>>,
    },
    Corporate(FetchOutcome<CorporateDashboard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditQuantity { sku: String, buffer: String },
    LogWaste(WasteForm),
    CountInventory(CountForm),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WasteForm {
    pub product: usize,
    pub quantity: String,
    pub reason: usize,
}

/// Manual shelf count for one catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountForm {
    pub product: usize,
    pub count: String,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

pub struct AppState {
    pub signed_in: SignedIn,
    pub catalog: Arc<Catalog>,
    pub view: NavView,
    pub session: Option<ReviewSession>,
    pub cursor: usize,
    pub input: InputMode,
    pub history: Vec<OrderHistoryEntry>,
    pub spoilage: SpoilageLog,
    pub recent_spoilage_rows: usize,
    pub mailbox: Mailbox,
    pub mailbox_cursor: usize,
    pub regional: RegionalView,
    pub corporate: CorporateView,
    pub loading: HashSet<NavView>,
    pub logs: VecDeque<LogEntry>,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        signed_in: SignedIn,
        session: Option<ReviewSession>,
        recent_spoilage_rows: usize,
    ) -> Self {
        let regional = RegionalView::new(&catalog, &signed_in.user);
        Self {
            view: signed_in.home_view(),
            signed_in,
            catalog,
            session,
            cursor: 0,
            input: InputMode::Normal,
            history: Vec::new(),
            spoilage: SpoilageLog::default(),
            recent_spoilage_rows,
            mailbox: Mailbox::default(),
            mailbox_cursor: 0,
            regional,
            corporate: CorporateView::default(),
            loading: HashSet::new(),
            logs: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }

    pub fn engine(&self) -> Option<&ReviewEngine> {
        self.session.as_ref().map(|s| s.engine())
    }

    pub fn is_loading(&self) -> bool {
        !self.loading.is_empty()
            || self
                .session
                .as_ref()
                .is_some_and(|s| s.state() == LoadState::Loading)
    }

    /// The recommendation under the cursor in the filtered view.
    pub fn current(&self) -> Option<&OrderRecommendation> {
        self.engine()
            .and_then(|e| e.filtered_view().get(self.cursor).copied())
    }

    fn current_sku(&self) -> Option<String> {
        self.current().map(|r| r.sku.clone())
    }

    pub fn mark_loading(&mut self, view: NavView) {
        self.loading.insert(view);
    }

    pub fn install_batch(&mut self, loaded: BatchLoaded) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.apply(loaded) {
            if let Some(message) = session.error().map(str::to_string) {
                self.push_log("ERROR", message);
            }
            self.clamp_cursor();
        }
    }

    pub fn install_view_data(&mut self, data: ViewData) {
        let (view, error) = match data {
            ViewData::History(outcome) => {
                self.history = outcome.data;
                (NavView::OrderHistory, outcome.error)
            }
            ViewData::Spoilage(outcome) => {
                self.spoilage = SpoilageLog::new(outcome.data);
                (NavView::SpoilageAnalysis, outcome.error)
            }
            ViewData::Notifications(outcome) => {
                self.mailbox = Mailbox::new(outcome.data);
                self.mailbox_cursor = 0;
                (NavView::Mailbox, outcome.error)
            }
            ViewData::Regional { region, outcome } => {
                if self.regional.region() != Some(region.as_str()) {
                    tracing::debug!(%region, "dropping performance rows for deselected region");
                    return;
                }
                self.regional.set_rows(outcome.data);
                (NavView::RegionalView, outcome.error)
            }
            ViewData::Corporate(outcome) => {
                self.corporate = CorporateView::new(outcome.data);
                (NavView::Corporate, outcome.error)
            }
        };
        self.loading.remove(&view);
        if let Some(message) = error {
            self.push_log("ERROR", message);
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.engine().map(|e| e.filtered_view().len()).unwrap_or(0);
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn switch_view(&mut self, forward: bool) -> Option<TuiCommand> {
        let views = self.signed_in.views();
        if views.len() < 2 {
            return None;
        }
        let idx = views.iter().position(|v| *v == self.view).unwrap_or(0);
        let next = if forward {
            (idx + 1) % views.len()
        } else {
            (idx + views.len() - 1) % views.len()
        };
        self.view = views[next];
        Some(TuiCommand::Load(self.view))
    }

    /// Apply one key press. Returns a command when the loop has work to do.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<TuiCommand> {
        match std::mem::replace(&mut self.input, InputMode::Normal) {
            InputMode::EditQuantity { sku, buffer } => self.edit_quantity_key(code, sku, buffer),
            InputMode::LogWaste(form) => self.waste_form_key(code, form),
            InputMode::CountInventory(form) => self.count_form_key(code, form),
            InputMode::Normal => match code {
                KeyCode::Char('q') => Some(TuiCommand::Quit),
                KeyCode::Tab => self.switch_view(true),
                KeyCode::BackTab => self.switch_view(false),
                _ => match self.view {
                    NavView::Orders => self.orders_key(code),
                    NavView::Mailbox => self.mailbox_key(code),
                    NavView::RegionalView => self.regional_key(code),
                    NavView::SpoilageAnalysis => self.spoilage_key(code),
                    NavView::OrderHistory | NavView::Corporate => match code {
                        KeyCode::Char('r') => Some(TuiCommand::Load(self.view)),
                        _ => None,
                    },
                },
            },
        }
    }

    fn orders_key(&mut self, code: KeyCode) -> Option<TuiCommand> {
        if code == KeyCode::Char('m') {
            if !self.catalog.products().is_empty() {
                self.input = InputMode::CountInventory(CountForm::default());
            }
            return None;
        }
        let sku = self.current_sku();
        let reasons = self.catalog.justification_reasons().to_vec();
        let categories = self.catalog.categories();
        let session = self.session.as_mut()?;
        let engine = session.engine_mut();

        match code {
            KeyCode::Down | KeyCode::Char('j') => self.cursor += 1,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Char(' ') => {
                if let Some(sku) = &sku {
                    engine.toggle_select(sku);
                }
            }
            KeyCode::Char('a') => {
                let checked = !engine.is_all_selected();
                engine.select_all(checked);
            }
            KeyCode::Enter => {
                if let Some(sku) = &sku {
                    engine.approve(sku);
                }
            }
            KeyCode::Char('A') => {
                let n = engine.approve_selected();
                self.push_log("INFO", format!("Approved {} selected item(s)", n));
            }
            KeyCode::Char('e') => {
                if let Some(rec) = sku.as_deref().and_then(|s| engine.get(s)) {
                    self.input = InputMode::EditQuantity {
                        sku: rec.sku.clone(),
                        buffer: rec.adjusted_qty().to_string(),
                    };
                }
            }
            KeyCode::Char('n') => {
                if let Some(rec) = sku.as_deref().and_then(|s| engine.get(s)) {
                    let next = next_justification(&reasons, rec.justification());
                    let sku = rec.sku.clone();
                    engine.set_justification(&sku, &next);
                }
            }
            KeyCode::Char('s') => {
                let next = engine.status_filter().next();
                engine.set_status_filter(next);
            }
            KeyCode::Char('c') => {
                let next = engine.category_filter().next(&categories);
                engine.set_category_filter(next);
            }
            KeyCode::Char('r') => return Some(TuiCommand::RefreshBatch),
            _ => {}
        }
        self.clamp_cursor();
        None
    }

    fn edit_quantity_key(&mut self, code: KeyCode, sku: String, mut buffer: String) -> Option<TuiCommand> {
        match code {
            KeyCode::Esc => {}
            KeyCode::Enter => {
                let result = self
                    .session
                    .as_mut()
                    .map(|s| s.engine_mut().set_quantity_input(&sku, &buffer));
                if let Some(Err(e)) = result {
                    tracing::warn!(sku = %sku, error = %e, "quantity edit rejected");
                    self.push_log("WARN", e.to_string());
                }
                self.clamp_cursor();
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.input = InputMode::EditQuantity { sku, buffer };
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.input = InputMode::EditQuantity { sku, buffer };
            }
            _ => self.input = InputMode::EditQuantity { sku, buffer },
        }
        None
    }

    fn count_form_key(&mut self, code: KeyCode, mut form: CountForm) -> Option<TuiCommand> {
        let products = self.catalog.products().len().max(1);
        match code {
            KeyCode::Esc => return None,
            KeyCode::Enter => return self.submit_count(form),
            KeyCode::Right => form.product = (form.product + 1) % products,
            KeyCode::Left => form.product = (form.product + products - 1) % products,
            KeyCode::Backspace => {
                form.count.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => form.count.push(c),
            _ => {}
        }
        self.input = InputMode::CountInventory(form);
        None
    }

    /// A recorded count refreshes the batch so recommendations reflect it.
    fn submit_count(&mut self, form: CountForm) -> Option<TuiCommand> {
        let product = self.catalog.products().get(form.product)?;
        let (sku, name) = (product.sku.clone(), product.name.clone());
        let Ok(count) = form.count.trim().parse::<u64>() else {
            self.push_log("WARN", format!("'{}' is not a count", form.count));
            return None;
        };
        tracing::info!(sku = %sku, count, "manual inventory count");
        self.push_log(
            "INFO",
            format!(
                "Inventory for {} ({}) updated to {}. Recommendations will be refreshed shortly.",
                name, sku, count
            ),
        );
        self.session.as_ref().map(|_| TuiCommand::RefreshBatch)
    }

    fn mailbox_key(&mut self, code: KeyCode) -> Option<TuiCommand> {
        let len = self.mailbox.notifications().len();
        match code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.mailbox_cursor = (self.mailbox_cursor + 1).min(len.saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.mailbox_cursor = self.mailbox_cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(id) = self
                    .mailbox
                    .notifications()
                    .get(self.mailbox_cursor)
                    .map(|n| n.id.clone())
                {
                    self.mailbox.toggle_read(&id);
                }
            }
            KeyCode::Char('r') => return Some(TuiCommand::Load(NavView::Mailbox)),
            _ => {}
        }
        None
    }

    fn regional_key(&mut self, code: KeyCode) -> Option<TuiCommand> {
        match code {
            KeyCode::Char('g') => {
                if self.regional.next_region() {
                    return self.regional.region().map(|r| TuiCommand::LoadRegion(r.to_string()));
                }
            }
            KeyCode::Char('t') => self.regional.next_store(),
            KeyCode::Char('r') => return Some(TuiCommand::Load(NavView::RegionalView)),
            _ => {}
        }
        None
    }

    fn spoilage_key(&mut self, code: KeyCode) -> Option<TuiCommand> {
        match code {
            KeyCode::Char('w') if !self.catalog.products().is_empty() => {
                self.input = InputMode::LogWaste(WasteForm::default());
            }
            KeyCode::Char('r') => return Some(TuiCommand::Load(NavView::SpoilageAnalysis)),
            _ => {}
        }
        None
    }

    fn waste_form_key(&mut self, code: KeyCode, mut form: WasteForm) -> Option<TuiCommand> {
        let products = self.catalog.products().len().max(1);
        let reasons = SpoilageReason::ALL.len();
        match code {
            KeyCode::Esc => return None,
            KeyCode::Enter => {
                self.submit_waste(form);
                return None;
            }
            KeyCode::Right => form.product = (form.product + 1) % products,
            KeyCode::Left => form.product = (form.product + products - 1) % products,
            KeyCode::Down => form.reason = (form.reason + 1) % reasons,
            KeyCode::Up => form.reason = (form.reason + reasons - 1) % reasons,
            KeyCode::Backspace => {
                form.quantity.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => form.quantity.push(c),
            _ => {}
        }
        self.input = InputMode::LogWaste(form);
        None
    }

    fn submit_waste(&mut self, form: WasteForm) {
        let Some(product) = self.catalog.products().get(form.product) else {
            return;
        };
        let Ok(quantity) = form.quantity.trim().parse::<i64>() else {
            self.push_log("WARN", format!("'{}' is not a quantity", form.quantity));
            return;
        };
        let entry = WasteEntry {
            sku: product.sku.clone(),
            quantity,
            reason: SpoilageReason::ALL[form.reason % SpoilageReason::ALL.len()],
            recorded_date: None,
        };
        let message = match self.spoilage.log_waste(&self.catalog, entry) {
            Ok(record) => format!("Logged {} x {} ({})", record.quantity, record.product_name, record.reason),
            Err(e) => e.to_string(),
        };
        self.push_log("INFO", message);
    }
}

/// Cycle through the configured reasons, with an empty slot between the last
/// and the first.
fn next_justification(reasons: &[String], current: &str) -> String {
    match reasons.iter().position(|r| r == current) {
        Some(i) => reasons.get(i + 1).cloned().unwrap_or_default(),
        None => reasons.first().cloned().unwrap_or_default(),
    }
}
