use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tracing::warn;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::calculator::{compute_amount, parse_number, ItemUpdate};
use crate::invoice_gen::format_currency;
use crate::models::{InvoiceDraft, ItemId};

// Represents a field in the invoice form
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FormField {
    ClientName,
    ClientEmail,
    ClientCompany,
    ClientAddress,
    Tax,
    LineItems,
    Notes,
    Terms,
}

impl FormField {
    fn is_multiline(self) -> bool {
        matches!(self, FormField::ClientAddress | FormField::Notes | FormField::Terms)
    }
}

// Represents a field being edited on a single line item
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineItemField {
    Description,
    Quantity,
    Rate,
}

pub enum InvoiceFormAction {
    Quit,
    Export,
}

pub struct InvoiceFormState {
    draft: InvoiceDraft,
    current_field: FormField,
    line_items_list_state: ListState,
    editing_line_item: Option<(ItemId, LineItemField, String)>, // (item, field, current text)
    editing: bool,
    active_input: String,
    show_error: Option<String>,
    status: Option<String>,
}

impl InvoiceFormState {
    pub fn new(tax_percent: f64) -> Self {
        let mut line_items_list_state = ListState::default();
        line_items_list_state.select(Some(0));

        Self {
            draft: InvoiceDraft::new(tax_percent),
            current_field: FormField::ClientName,
            line_items_list_state,
            editing_line_item: None,
            editing: false,
            active_input: String::new(),
            show_error: None,
            status: None,
        }
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.show_error = Some(message.into());
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;

        if self.editing {
            if self.current_field == FormField::Tax {
                self.active_input = self.draft.tax_percent.to_string();
            }
        } else {
            self.editing_line_item = None;
            self.active_input.clear();
            if self
                .draft
                .client
                .company
                .as_deref()
                .is_some_and(|company| company.is_empty())
            {
                self.draft.client.company = None;
            }
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::ClientName => FormField::ClientEmail,
            FormField::ClientEmail => FormField::ClientCompany,
            FormField::ClientCompany => FormField::ClientAddress,
            FormField::ClientAddress => FormField::Tax,
            FormField::Tax => FormField::LineItems,
            FormField::LineItems => FormField::Notes,
            FormField::Notes => FormField::Terms,
            FormField::Terms => FormField::ClientName,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::ClientName => FormField::Terms,
            FormField::ClientEmail => FormField::ClientName,
            FormField::ClientCompany => FormField::ClientEmail,
            FormField::ClientAddress => FormField::ClientCompany,
            FormField::Tax => FormField::ClientAddress,
            FormField::LineItems => FormField::Tax,
            FormField::Notes => FormField::LineItems,
            FormField::Terms => FormField::Notes,
        };
    }

    fn selected_item_id(&self) -> Option<ItemId> {
        self.line_items_list_state
            .selected()
            .and_then(|index| self.draft.items.get(index))
            .map(|item| item.id)
    }

    pub fn add_line_item(&mut self) {
        let id = self.draft.add_item();
        self.line_items_list_state.select(Some(self.draft.items.len() - 1));
        self.editing_line_item = Some((id, LineItemField::Description, String::new()));
    }

    pub fn edit_line_item(&mut self) {
        if let Some(id) = self.selected_item_id() {
            let description = self
                .draft
                .item(id)
                .map(|item| item.description.clone())
                .unwrap_or_default();
            self.editing_line_item = Some((id, LineItemField::Description, description));
        }
    }

    pub fn delete_line_item(&mut self) {
        let Some(selected) = self.line_items_list_state.selected() else {
            return;
        };
        let Some(id) = self.selected_item_id() else {
            return;
        };

        if let Err(err) = self.draft.remove_item(id) {
            self.set_error(err.to_string());
            return;
        }

        // Adjust selection after deletion
        if self.draft.items.is_empty() {
            self.line_items_list_state.select(None);
        } else {
            self.line_items_list_state
                .select(Some(selected.min(self.draft.items.len() - 1)));
        }
        self.editing_line_item = None;
    }

    fn select_previous_item(&mut self) {
        let len = self.draft.items.len();
        if len > 0 {
            let i = match self.line_items_list_state.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            self.line_items_list_state.select(Some(i));
        }
    }

    fn select_next_item(&mut self) {
        let len = self.draft.items.len();
        if len > 0 {
            let i = match self.line_items_list_state.selected() {
                Some(i) if i + 1 < len => i + 1,
                _ => 0,
            };
            self.line_items_list_state.select(Some(i));
        }
    }

    /// Commit the line item field being edited and move on to the next one.
    pub fn next_field_in_line_item(&mut self) {
        let Some((id, field, value)) = self.editing_line_item.take() else {
            return;
        };

        let update = match field {
            LineItemField::Description => ItemUpdate::Description(value),
            LineItemField::Quantity | LineItemField::Rate => match parse_number(&value) {
                Ok(number) if field == LineItemField::Quantity => ItemUpdate::Quantity(number),
                Ok(number) => ItemUpdate::Rate(number),
                Err(err) => {
                    warn!(%id, ?field, %err, "rejected line item input");
                    self.set_error(err.to_string());
                    self.editing_line_item = Some((id, field, value));
                    return;
                }
            },
        };

        if let Err(err) = self.draft.update_item(id, update) {
            self.set_error(err.to_string());
            return;
        }

        let Some(item) = self.draft.item(id) else {
            return;
        };
        self.editing_line_item = match field {
            LineItemField::Description => Some((id, LineItemField::Quantity, item.quantity.to_string())),
            LineItemField::Quantity => Some((id, LineItemField::Rate, item.rate.to_string())),
            LineItemField::Rate => None,
        };
    }

    fn commit_tax(&mut self) {
        match parse_number(&self.active_input) {
            Ok(tax) => {
                self.draft.tax_percent = tax;
                self.toggle_editing();
            }
            Err(err) => {
                warn!(input = %self.active_input, "rejected tax input");
                self.set_error(err.to_string());
            }
        }
    }

    fn text_field_mut(&mut self) -> Option<&mut String> {
        let client = &mut self.draft.client;
        match self.current_field {
            FormField::ClientName => Some(&mut client.name),
            FormField::ClientEmail => Some(&mut client.email),
            FormField::ClientCompany => Some(client.company.get_or_insert_with(String::new)),
            FormField::ClientAddress => Some(&mut client.address),
            FormField::Notes => Some(&mut self.draft.notes),
            FormField::Terms => Some(&mut self.draft.terms),
            FormField::Tax | FormField::LineItems => None,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            FormField::Tax => match key {
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                    self.active_input.push(c);
                }
                KeyCode::Backspace => {
                    self.active_input.pop();
                }
                _ => {}
            },
            FormField::LineItems => {
                if let Some((_, _, ref mut value)) = self.editing_line_item {
                    match key {
                        KeyCode::Char(c) => value.push(c),
                        KeyCode::Backspace => {
                            value.pop();
                        }
                        _ => {}
                    }
                }
            }
            _ => {
                let multiline = self.current_field.is_multiline();
                if let Some(field_value) = self.text_field_mut() {
                    match key {
                        KeyCode::Char(c) => field_value.push(c),
                        KeyCode::Enter if multiline => field_value.push('\n'),
                        KeyCode::Backspace => {
                            field_value.pop();
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Apply one key press to the form.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<InvoiceFormAction> {
        // Any key dismisses the error popup
        self.show_error = None;

        if !self.editing {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Some(InvoiceFormAction::Quit),
                KeyCode::Char('x') => return Some(InvoiceFormAction::Export),
                KeyCode::Up => self.previous_field(),
                KeyCode::Down | KeyCode::Tab => self.next_field(),
                KeyCode::Enter => self.toggle_editing(),
                _ => {}
            }
            return None;
        }

        match self.current_field {
            FormField::LineItems if self.editing_line_item.is_some() => match key.code {
                KeyCode::Esc => self.editing_line_item = None,
                KeyCode::Enter | KeyCode::Tab => self.next_field_in_line_item(),
                code => self.edit_current_field(code),
            },
            FormField::LineItems => match key.code {
                KeyCode::Esc | KeyCode::Enter => self.toggle_editing(),
                KeyCode::Char('a') => self.add_line_item(),
                KeyCode::Char('e') => self.edit_line_item(),
                KeyCode::Char('d') => self.delete_line_item(),
                KeyCode::Up => self.select_previous_item(),
                KeyCode::Down => self.select_next_item(),
                _ => {}
            },
            FormField::Tax => match key.code {
                KeyCode::Esc => self.toggle_editing(),
                KeyCode::Enter => self.commit_tax(),
                code => self.edit_current_field(code),
            },
            field => match key.code {
                KeyCode::Esc => self.toggle_editing(),
                KeyCode::Enter if !field.is_multiline() => self.toggle_editing(),
                code => self.edit_current_field(code),
            },
        }

        None
    }
}

pub fn render_invoice_form<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),  // Title
                Constraint::Min(16),    // Form
                Constraint::Length(1),  // Status
                Constraint::Length(3),  // Help
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new("New Invoice")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_form(frame, state, chunks[1]);

    if let Some(status) = &state.status {
        let status = Paragraph::new(status.as_str()).style(Style::default().fg(Color::Green));
        frame.render_widget(status, chunks[2]);
    }

    let help_text = match (state.editing, state.current_field) {
        (false, _) => "Enter - Edit field | Up/Down - Navigate fields | X - Export PDF | Q/Esc - Quit",
        (true, FormField::LineItems) => {
            if state.editing_line_item.is_some() {
                "Enter/Tab - Next field | Esc - Stop editing item"
            } else {
                "A - Add item | E - Edit selected | D - Delete selected | Enter/Esc - Done"
            }
        }
        (true, FormField::ClientAddress | FormField::Notes | FormField::Terms) => {
            "Enter - New line | Esc - Done"
        }
        (true, _) => "Enter - Save field | Esc - Done",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);

    if let Some(error) = &state.show_error {
        render_error(frame, frame.size(), error);
    }
}

fn field_style(state: &InvoiceFormState, field: FormField) -> Style {
    if state.current_field == field {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn field_value(state: &InvoiceFormState, field: FormField, value: &str) -> String {
    if state.current_field == field && state.editing {
        format!("{}|", value)
    } else {
        value.to_string()
    }
}

fn render_text_field<B: Backend>(
    frame: &mut Frame<B>,
    state: &InvoiceFormState,
    field: FormField,
    label: &str,
    value: &str,
    area: Rect,
) {
    let paragraph = Paragraph::new(field_value(state, field, value))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(label, field_style(state, field)))
                .borders(Borders::ALL),
        );
    frame.render_widget(paragraph, area);
}

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceFormState, area: Rect) {
    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),  // Name, email, company
                Constraint::Length(5),  // Address, notes, terms
                Constraint::Min(5),     // Line items
                Constraint::Length(3),  // Tax and totals
            ]
            .as_ref(),
        )
        .split(area);

    let thirds = [
        Constraint::Percentage(34),
        Constraint::Percentage(33),
        Constraint::Percentage(33),
    ];
    let client_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(thirds.as_ref())
        .split(form_chunks[0]);
    let text_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(thirds.as_ref())
        .split(form_chunks[1]);

    let client = &state.draft.client;
    let company = client.company.clone().unwrap_or_default();
    render_text_field(frame, state, FormField::ClientName, "Client Name", &client.name, client_row[0]);
    render_text_field(frame, state, FormField::ClientEmail, "Client Email", &client.email, client_row[1]);
    render_text_field(frame, state, FormField::ClientCompany, "Company", &company, client_row[2]);
    render_text_field(frame, state, FormField::ClientAddress, "Address", &client.address, text_row[0]);
    render_text_field(frame, state, FormField::Notes, "Notes", &state.draft.notes, text_row[1]);
    render_text_field(frame, state, FormField::Terms, "Terms", &state.draft.terms, text_row[2]);

    render_line_items(frame, state, form_chunks[2]);
    render_totals(frame, state, form_chunks[3]);
}

fn render_line_items<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceFormState, area: Rect) {
    let line_items_block = Block::default()
        .title(if state.current_field == FormField::LineItems {
            "Line Items (selected)"
        } else {
            "Line Items"
        })
        .borders(Borders::ALL)
        .style(field_style(state, FormField::LineItems));

    if let Some((id, field, value)) = &state.editing_line_item {
        // Editing a single line item
        let edit_area = line_items_block.inner(area);
        frame.render_widget(line_items_block, area);

        let Some(item) = state.draft.item(*id) else {
            return;
        };

        let edit_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40), // Description
                Constraint::Percentage(20), // Quantity
                Constraint::Percentage(20), // Rate
                Constraint::Percentage(20), // Amount
            ])
            .split(edit_area);

        let shown = |which: LineItemField, stored: String| {
            if *field == which {
                (format!("{}|", value), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                (stored, Style::default())
            }
        };

        // Preview the amount with whatever is typed so far
        let typed = parse_number(value).ok();
        let (quantity, rate) = match field {
            LineItemField::Quantity => (typed.unwrap_or(item.quantity), item.rate),
            LineItemField::Rate => (item.quantity, typed.unwrap_or(item.rate)),
            LineItemField::Description => (item.quantity, item.rate),
        };

        let cells = [
            ("Description", shown(LineItemField::Description, item.description.clone())),
            ("Qty", shown(LineItemField::Quantity, item.quantity.to_string())),
            ("Rate", shown(LineItemField::Rate, item.rate.to_string())),
            ("Amount", (format_currency(compute_amount(quantity, rate)), Style::default())),
        ];
        for ((label, (text, style)), cell_area) in cells.into_iter().zip(edit_chunks.iter()) {
            let paragraph = Paragraph::new(Spans::from(vec![Span::styled(text, style)]))
                .block(Block::default().title(label).borders(Borders::ALL));
            frame.render_widget(paragraph, *cell_area);
        }
        return;
    }

    if state.draft.items.is_empty() {
        let paragraph = Paragraph::new("No line items, press Enter then A to add one")
            .block(line_items_block);
        frame.render_widget(paragraph, area);
        return;
    }

    let line_items = state
        .draft
        .items
        .iter()
        .map(|item| {
            let description = if item.description.is_empty() {
                "(no description)"
            } else {
                item.description.as_str()
            };
            ListItem::new(format!(
                "{}: {} x {} = {}",
                description,
                item.quantity,
                format_currency(item.rate),
                format_currency(item.amount())
            ))
        })
        .collect::<Vec<_>>();

    let list = List::new(line_items)
        .block(line_items_block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    frame.render_stateful_widget(list, area, &mut state.line_items_list_state);
}

fn render_totals<B: Backend>(frame: &mut Frame<B>, state: &InvoiceFormState, area: Rect) {
    let totals = state.draft.totals();

    let tax_value = if state.current_field == FormField::Tax && state.editing {
        format!("{}|", state.active_input)
    } else {
        state.draft.tax_percent.to_string()
    };

    let line = Spans::from(vec![
        Span::styled("Tax %: ", field_style(state, FormField::Tax)),
        Span::raw(tax_value),
        Span::raw("   Subtotal: "),
        Span::raw(format_currency(totals.subtotal)),
        Span::raw("   Tax: "),
        Span::raw(format_currency(totals.tax_amount)),
        Span::raw("   Total: "),
        Span::styled(
            format_currency(totals.total),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_error<B: Backend>(frame: &mut Frame<B>, size: Rect, error: &str) {
    let popup_area = centered_rect(60, 20, size);

    let error_msg = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(error),
        Spans::from(""),
        Spans::from("Press any key to continue"),
    ])
    .block(Block::default().title("Error").borders(Borders::ALL))
    .style(Style::default().fg(Color::Red));

    frame.render_widget(tui::widgets::Clear, popup_area);
    frame.render_widget(error_msg, popup_area);
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Block for the next terminal event and apply it if it is a key press.
pub fn handle_input(state: &mut InvoiceFormState) -> Result<Option<InvoiceFormAction>> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            return Ok(state.handle_key(key));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(state: &mut InvoiceFormState, code: KeyCode) -> Option<InvoiceFormAction> {
        state.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(state: &mut InvoiceFormState, text: &str) {
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    fn clear_input(state: &mut InvoiceFormState) {
        for _ in 0..10 {
            press(state, KeyCode::Backspace);
        }
    }

    fn go_to(state: &mut InvoiceFormState, field: FormField) {
        while state.current_field != field {
            press(state, KeyCode::Down);
        }
    }

    #[test]
    fn editing_a_row_updates_amount_and_totals() {
        let mut state = InvoiceFormState::new(10.0);
        go_to(&mut state, FormField::LineItems);

        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Char('e'));
        type_text(&mut state, "Design work");
        press(&mut state, KeyCode::Enter);
        clear_input(&mut state);
        type_text(&mut state, "10");
        press(&mut state, KeyCode::Enter);
        clear_input(&mut state);
        type_text(&mut state, "50");
        press(&mut state, KeyCode::Enter);

        let item = &state.draft().items[0];
        assert_eq!(item.description, "Design work");
        assert_eq!(item.amount(), 500.0);
        assert_eq!(state.draft().totals().total, 550.0);
        assert!(state.show_error.is_none());
    }

    #[test]
    fn letters_typed_into_a_row_are_text_not_commands() {
        let mut state = InvoiceFormState::new(0.0);
        go_to(&mut state, FormField::LineItems);
        press(&mut state, KeyCode::Enter);

        press(&mut state, KeyCode::Char('a'));
        type_text(&mut state, "add");
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.draft().items.len(), 2);
        assert_eq!(state.draft().items[1].description, "add");
    }

    #[test]
    fn invalid_quantity_is_rejected_and_kept_for_correction() {
        let mut state = InvoiceFormState::new(0.0);
        go_to(&mut state, FormField::LineItems);
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Char('e'));
        press(&mut state, KeyCode::Enter);
        clear_input(&mut state);
        type_text(&mut state, "abc");

        press(&mut state, KeyCode::Enter);

        assert!(state.show_error.is_some());
        assert_eq!(state.draft().items[0].quantity, 1.0);
        assert!(matches!(
            state.editing_line_item,
            Some((_, LineItemField::Quantity, ref text)) if text == "abc"
        ));
    }

    #[test]
    fn deleting_every_row_is_allowed() {
        let mut state = InvoiceFormState::new(0.0);
        go_to(&mut state, FormField::LineItems);
        press(&mut state, KeyCode::Enter);

        press(&mut state, KeyCode::Char('d'));
        press(&mut state, KeyCode::Char('d'));

        assert!(state.draft().items.is_empty());
        assert_eq!(state.line_items_list_state.selected(), None);
        assert_eq!(state.draft().totals().total, 0.0);
    }

    #[test]
    fn tax_is_parsed_on_commit() {
        let mut state = InvoiceFormState::new(0.0);
        go_to(&mut state, FormField::Tax);

        press(&mut state, KeyCode::Enter);
        clear_input(&mut state);
        type_text(&mut state, "12.5");
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.draft().tax_percent, 12.5);
        assert!(!state.editing);
    }

    #[test]
    fn malformed_tax_keeps_previous_value() {
        let mut state = InvoiceFormState::new(5.0);
        go_to(&mut state, FormField::Tax);

        press(&mut state, KeyCode::Enter);
        type_text(&mut state, ".5.");
        press(&mut state, KeyCode::Enter);

        assert!(state.show_error.is_some());
        assert_eq!(state.draft().tax_percent, 5.0);
        assert!(state.editing);
    }

    #[test]
    fn address_accepts_line_breaks() {
        let mut state = InvoiceFormState::new(0.0);
        go_to(&mut state, FormField::ClientAddress);

        press(&mut state, KeyCode::Enter);
        type_text(&mut state, "1 Loop Rd");
        press(&mut state, KeyCode::Enter);
        type_text(&mut state, "Springfield");
        press(&mut state, KeyCode::Esc);

        assert_eq!(state.draft().client.address, "1 Loop Rd\nSpringfield");
        assert!(!state.editing);
    }

    #[test]
    fn client_name_and_empty_company() {
        let mut state = InvoiceFormState::new(0.0);

        press(&mut state, KeyCode::Enter);
        type_text(&mut state, "Acme");
        press(&mut state, KeyCode::Enter);
        go_to(&mut state, FormField::ClientCompany);
        press(&mut state, KeyCode::Enter);
        type_text(&mut state, "z");
        press(&mut state, KeyCode::Backspace);
        press(&mut state, KeyCode::Esc);

        assert_eq!(state.draft().client.name, "Acme");
        assert_eq!(state.draft().client.company, None);
    }

    #[test]
    fn export_and_quit_only_outside_edit_mode() {
        let mut state = InvoiceFormState::new(0.0);

        assert!(matches!(press(&mut state, KeyCode::Char('x')), Some(InvoiceFormAction::Export)));

        press(&mut state, KeyCode::Enter);
        assert!(press(&mut state, KeyCode::Char('x')).is_none());
        assert!(press(&mut state, KeyCode::Char('q')).is_none());
        assert_eq!(state.draft().client.name, "xq");

        press(&mut state, KeyCode::Enter);
        assert!(matches!(press(&mut state, KeyCode::Char('q')), Some(InvoiceFormAction::Quit)));
    }
}
