use crate::indexing::index::NameIndex;
use crate::search::ranker::RelevanceRanker;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// One visible line of the results pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Group {
        stem: String,
        title: String,
        /// First symbol of the group, shown as its representative
        icon: Option<String>,
        expanded: bool,
    },
    Symbol {
        stem: String,
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Quit,
    Deselect,
}

/// Action that fires once `due` has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAction {
    pub due: Instant,
    pub follow_up: FollowUp,
}

/// A symbol the user picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub name: String,
    pub identifier: String,
}

/// Session state of the interactive picker, kept apart from rendering
#[derive(Debug, Clone)]
pub struct PickerState {
    query: String,
    stems: Vec<String>,
    suggestions: Vec<String>,
    expanded: HashSet<String>,
    // term is the stem, so a group's order survives query changes
    sorted_groups: HashMap<String, Vec<String>>,
    rows: Vec<Row>,
    cursor: usize,
    selected: Option<String>,
    quit_on_select: bool,
    select_delay: Duration,
    picks: Vec<Pick>,
    pending: Option<ScheduledAction>,
}

impl PickerState {
    pub fn new(quit_on_select: bool, select_delay: Duration) -> Self {
        Self {
            query: String::new(),
            stems: Vec::new(),
            suggestions: Vec::new(),
            expanded: HashSet::new(),
            sorted_groups: HashMap::new(),
            rows: Vec::new(),
            cursor: 0,
            selected: None,
            quit_on_select,
            select_delay,
            picks: Vec::new(),
            pending: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn stems(&self) -> &[String] {
        &self.stems
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn quit_on_select(&self) -> bool {
        self.quit_on_select
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn into_picks(self) -> Vec<Pick> {
        self.picks
    }

    pub fn is_expanded(&self, stem: &str) -> bool {
        self.expanded.contains(stem)
    }

    /// Replace the search text and recompute stems and suggestions for it
    pub fn set_query(&mut self, query: String, ranker: &RelevanceRanker, index: &NameIndex) {
        self.stems = ranker.related_stems(&query, index);
        self.suggestions = if query.is_empty() {
            Vec::new()
        } else {
            ranker.neighbors(&query)
        };
        self.query = query;
        self.cursor = 0;
        self.rebuild_rows(ranker, index);
    }

    pub fn push_char(&mut self, c: char, ranker: &RelevanceRanker, index: &NameIndex) {
        let mut query = self.query.clone();
        query.push(c);
        self.set_query(query, ranker, index);
    }

    pub fn pop_char(&mut self, ranker: &RelevanceRanker, index: &NameIndex) {
        let mut query = self.query.clone();
        if query.pop().is_some() {
            self.set_query(query, ranker, index);
        }
    }

    /// Use suggestion number `position` as the new search text
    pub fn apply_suggestion(
        &mut self,
        position: usize,
        ranker: &RelevanceRanker,
        index: &NameIndex,
    ) -> bool {
        match self.suggestions.get(position).cloned() {
            Some(word) => {
                self.set_query(word, ranker, index);
                true
            }
            None => false,
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    pub fn toggle_quit_on_select(&mut self) {
        self.quit_on_select = !self.quit_on_select;
    }

    /// Expand a collapsed group or collapse an expanded one
    pub fn toggle_group(&mut self, stem: &str, ranker: &RelevanceRanker, index: &NameIndex) {
        if !self.expanded.remove(stem) {
            self.expanded.insert(stem.to_string());
        }
        self.rebuild_rows(ranker, index);
        if let Some(position) = self.rows.iter().position(
            |row| matches!(row, Row::Group { stem: s, .. } if s == stem),
        ) {
            self.cursor = position;
        }
    }

    /// Act on the row under the cursor: toggle a group, or pick a symbol
    pub fn activate(
        &mut self,
        ranker: &RelevanceRanker,
        index: &NameIndex,
        now: Instant,
    ) -> Option<Pick> {
        match self.rows.get(self.cursor).cloned()? {
            Row::Group { stem, .. } => {
                self.toggle_group(&stem, ranker, index);
                None
            }
            Row::Symbol { name, .. } => self.pick(&name, index, now),
        }
    }

    /// Highlight `name`, record it, and schedule the follow-up action.
    /// Any earlier pending action is replaced. A delay too large to represent
    /// leaves nothing scheduled.
    pub fn pick(&mut self, name: &str, index: &NameIndex, now: Instant) -> Option<Pick> {
        let identifier = index.identifier(name)?.to_string();
        let pick = Pick {
            name: name.to_string(),
            identifier,
        };
        self.selected = Some(name.to_string());
        self.picks.push(pick.clone());
        let follow_up = if self.quit_on_select {
            FollowUp::Quit
        } else {
            FollowUp::Deselect
        };
        self.pending = now
            .checked_add(self.select_delay)
            .map(|due| ScheduledAction { due, follow_up });
        Some(pick)
    }

    pub fn pending(&self) -> Option<ScheduledAction> {
        self.pending
    }

    /// Time left until the pending action fires
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|action| action.due.saturating_duration_since(now))
    }

    /// Run the pending action if it is due. Returns true when the picker should quit.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(action) if action.due <= now => {
                self.pending = None;
                match action.follow_up {
                    FollowUp::Quit => true,
                    FollowUp::Deselect => {
                        self.selected = None;
                        false
                    }
                }
            }
            _ => false,
        }
    }

    fn rebuild_rows(&mut self, ranker: &RelevanceRanker, index: &NameIndex) {
        let mut rows = Vec::new();
        for stem in &self.stems {
            let expanded = self.expanded.contains(stem);
            rows.push(Row::Group {
                stem: stem.clone(),
                title: capitalize(stem),
                icon: index.names_for_stem(stem).first().cloned(),
                expanded,
            });
            if expanded {
                let names = self
                    .sorted_groups
                    .entry(stem.clone())
                    .or_insert_with(|| {
                        ranker.sort_names_within_stem(index.names_for_stem(stem), stem)
                    });
                rows.extend(names.iter().map(|name| Row::Symbol {
                    stem: stem.clone(),
                    name: name.clone(),
                }));
            }
        }
        self.rows = rows;
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
    }
}

/// Suggestion slot for an Alt+digit shortcut: '1'..'9' are the first nine,
/// '0' is the tenth
pub fn suggestion_position(digit: char) -> Option<usize> {
    digit.to_digit(10).map(|d| (d as usize + 9) % 10)
}

/// Upper-case the first character: "info" -> "Info"
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
