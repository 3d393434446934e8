use api_types::{
    Selection,
    record::{NewRecord, TransactionType},
};
use chrono::NaiveDate;
use ledger_view::{ElementKind, Focusable, FormFields, MoneyCents, OptionList};

use crate::app::state::FocusTarget;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields of the new-expense dialog.
#[derive(Debug, Clone)]
pub struct ExpenseForm {
    pub name: String,
    pub date: String,
    pub amount: String,
    pub transaction_type: TransactionType,
    pub category: Selection,
    pub bank: String,
    pub error: Option<String>,
    today: NaiveDate,
}

impl ExpenseForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            amount: String::new(),
            transaction_type: TransactionType::Expense,
            category: Selection::All,
            bank: String::new(),
            error: None,
            today,
        }
    }

    /// Dialog elements in the order they are drawn.
    pub fn elements(&self, submitting: bool) -> Vec<Focusable<FocusTarget>> {
        vec![
            Focusable::new(FocusTarget::FormHeading, ElementKind::Other),
            Focusable::new(FocusTarget::FormName, ElementKind::Input),
            Focusable::new(FocusTarget::FormDate, ElementKind::Input),
            Focusable::new(FocusTarget::FormAmount, ElementKind::Input),
            Focusable::new(FocusTarget::FormType, ElementKind::Select),
            Focusable::new(FocusTarget::FormCategory, ElementKind::Select),
            Focusable::new(FocusTarget::FormBank, ElementKind::Input),
            Focusable::new(FocusTarget::FormCancel, ElementKind::Button),
            Focusable::new(FocusTarget::FormSave, ElementKind::Button).disabled(submitting),
        ]
    }

    pub fn text_field_mut(&mut self, target: FocusTarget) -> Option<&mut String> {
        match target {
            FocusTarget::FormName => Some(&mut self.name),
            FocusTarget::FormDate => Some(&mut self.date),
            FocusTarget::FormAmount => Some(&mut self.amount),
            FocusTarget::FormBank => Some(&mut self.bank),
            _ => None,
        }
    }

    pub fn toggle_type(&mut self) {
        self.transaction_type = match self.transaction_type {
            TransactionType::Income => TransactionType::Expense,
            TransactionType::Expense => TransactionType::Income,
        };
    }

    pub fn cycle_category(&mut self, options: &OptionList, backwards: bool) {
        self.category = options.cycle(&self.category, backwards);
    }

    /// Checks the inputs and builds the record to create.
    pub fn validate(&self) -> Result<NewRecord, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required.".to_string());
        }
        let expense_date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| "Date must be YYYY-MM-DD.".to_string())?;
        let amount = self
            .amount
            .trim()
            .parse::<MoneyCents>()
            .map_err(|err| err.to_string())?;
        if amount.cents() == 0 {
            return Err("Amount must be greater than zero.".to_string());
        }
        let bank = self.bank.trim();

        Ok(NewRecord {
            name: name.to_string(),
            expense_date,
            category_id: self.category.id().map(str::to_string),
            bank: (!bank.is_empty()).then(|| bank.to_string()),
            transaction_type: self.transaction_type,
            amount_minor: amount.cents(),
        })
    }
}

impl FormFields for ExpenseForm {
    fn clear(&mut self) {
        *self = Self::new(self.today);
    }

    fn show_error(&mut self, message: String) {
        self.error = Some(message);
    }
}
