use thiserror::Error;

/// Client-side check failures. `Display` is the dialog text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("タイトルを入力してください")]
    MissingTitle,
    #[error("少なくとも1つのステップを追加してください")]
    NoSteps,
}

/// Pre-submit check: a non-blank title and at least one step.
pub fn validate_manual_form(title: Option<&str>, step_count: usize) -> Result<(), FormError> {
    match title {
        Some(t) if !t.trim().is_empty() => {}
        _ => return Err(FormError::MissingTitle),
    }
    if step_count == 0 {
        return Err(FormError::NoSteps);
    }
    Ok(())
}

/// Heading of the step at 1-based `position`
pub fn step_label(position: usize) -> String {
    format!("ステップ {}", position)
}

/// Element id of a step block
pub fn step_element_id(id: u32) -> String {
    format!("step-{}", id)
}

/// Markup of a freshly added step block. Field names carry the step id; the
/// server reads them back as `step_<field>_<n>`.
pub fn step_block_html(id: u32) -> String {
    format!(
        r#"<div class="step-item" id="step-{id}">
    <div class="flex justify-between items-center mb-2">
        <h3>{label}</h3>
        <button type="button" class="btn btn-danger btn-sm" data-remove-step="{id}">削除</button>
    </div>
    <div class="form-group">
        <label class="form-label">タイトル</label>
        <input type="text" name="step_title_{id}" class="form-control" required>
    </div>
    <div class="form-group">
        <label class="form-label">内容</label>
        <textarea name="step_content_{id}" class="form-control" rows="4" required></textarea>
    </div>
    <div class="form-group">
        <label class="form-label">備考</label>
        <textarea name="step_notes_{id}" class="form-control" rows="2" placeholder="補足情報や注意事項など（任意）"></textarea>
    </div>
    <div class="form-group">
        <label class="form-label">画像</label>
        <input type="file" name="step_image_{id}" class="form-control" accept="image/*">
    </div>
</div>"#,
        id = id,
        label = step_label(id as usize),
    )
}

/// Where step blocks live. Blocks are relabeled together in display order
/// and addressed by step id for removal.
pub trait StepSurface {
    /// Number of blocks present
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest numeric id among present blocks
    fn max_step_id(&self) -> Option<u32>;

    /// Append a new block with id `id`
    fn render_step(&mut self, id: u32);

    /// Remove the block with id `id`; `false` if there is none
    fn remove_step(&mut self, id: u32) -> bool;

    /// Relabel every block in display order in one pass; `label` receives
    /// the 1-based position. Returns the number of blocks.
    fn relabel_steps(&mut self, label: &dyn Fn(usize) -> String) -> usize;

    /// Write the hidden step-count field
    fn set_step_count(&mut self, count: usize);
}

/// Step bookkeeping for one manual form.
pub struct StepForm<S: StepSurface> {
    surface: S,
    counter: u32,
}

impl<S: StepSurface> StepForm<S> {
    /// Take over the blocks already on the page and renumber them.
    ///
    /// The counter starts at the highest of: block count, highest block id,
    /// and 1, so new ids never collide with server-rendered ones.
    pub fn attach(surface: S) -> Self {
        let existing = surface.len() as u32;
        let counter = existing.max(surface.max_step_id().unwrap_or(0)).max(1);
        let mut form = Self { surface, counter };
        form.renumber();
        form
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn step_count(&self) -> usize {
        self.surface.len()
    }

    /// Append a block and return its id
    pub fn add_step(&mut self) -> u32 {
        self.counter += 1;
        let id = self.counter;
        self.surface.render_step(id);
        self.renumber();
        log::debug!("Added step {} ({} total)", id, self.step_count());
        id
    }

    /// Remove a block by id. Unknown ids are ignored.
    pub fn remove_step(&mut self, id: u32) -> bool {
        if !self.surface.remove_step(id) {
            return false;
        }
        self.renumber();
        log::debug!("Removed step {} ({} left)", id, self.step_count());
        true
    }

    /// Relabel blocks 1..n in display order and sync the count field
    pub fn renumber(&mut self) {
        let count = self.surface.relabel_steps(&step_label);
        self.surface.set_step_count(count);
    }

    pub fn validate(&self, title: Option<&str>) -> Result<(), FormError> {
        validate_manual_form(title, self.step_count())
    }
}

/// In-memory step blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    pub steps: Vec<MemoryStep>,
    pub step_count_field: Option<usize>,
    /// Completed relabel passes
    pub relabel_passes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStep {
    pub id: u32,
    pub label: String,
}

impl MemorySurface {
    /// Blocks as they would come from the server, labeled by id
    pub fn with_steps(ids: &[u32]) -> Self {
        Self {
            steps: ids
                .iter()
                .map(|&id| MemoryStep {
                    id,
                    label: step_label(id as usize),
                })
                .collect(),
            step_count_field: None,
            relabel_passes: 0,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.steps.iter().map(|s| s.id).collect()
    }
}

impl StepSurface for MemorySurface {
    fn len(&self) -> usize {
        self.steps.len()
    }

    fn max_step_id(&self) -> Option<u32> {
        self.steps.iter().map(|s| s.id).max()
    }

    fn render_step(&mut self, id: u32) {
        self.steps.push(MemoryStep {
            id,
            label: step_label(id as usize),
        });
    }

    fn remove_step(&mut self, id: u32) -> bool {
        match self.steps.iter().position(|s| s.id == id) {
            Some(index) => {
                self.steps.remove(index);
                true
            }
            None => false,
        }
    }

    fn relabel_steps(&mut self, label: &dyn Fn(usize) -> String) -> usize {
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.label = label(index + 1);
        }
        self.relabel_passes += 1;
        self.steps.len()
    }

    fn set_step_count(&mut self, count: usize) {
        self.step_count_field = Some(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_steps_to_empty_form() {
        let mut form = StepForm::attach(MemorySurface::default());
        assert_eq!(form.surface().step_count_field, Some(0));

        for _ in 0..4 {
            form.add_step();
        }
        let surface = form.surface();
        assert_eq!(
            surface.labels(),
            vec!["ステップ 1", "ステップ 2", "ステップ 3", "ステップ 4"]
        );
        assert_eq!(surface.step_count_field, Some(4));
        assert_eq!(form.step_count(), 4);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut form = StepForm::attach(MemorySurface::default());
        let a = form.add_step();
        let b = form.add_step();
        form.remove_step(a);
        let c = form.add_step();
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn test_remove_middle_step_renumbers() {
        let mut form = StepForm::attach(MemorySurface::with_steps(&[1, 2, 3]));
        assert!(form.remove_step(2));
        let surface = form.surface();
        assert_eq!(surface.ids(), vec![1, 3]);
        assert_eq!(surface.labels(), vec!["ステップ 1", "ステップ 2"]);
        assert_eq!(surface.step_count_field, Some(2));
    }

    #[test]
    fn test_remove_unknown_step_is_noop() {
        let mut form = StepForm::attach(MemorySurface::with_steps(&[1, 2, 3]));
        let before = form.surface().clone();
        assert!(!form.remove_step(42));
        assert_eq!(*form.surface(), before);
    }

    #[test]
    fn test_attach_renumbers_server_blocks() {
        let form = StepForm::attach(MemorySurface::with_steps(&[2, 5]));
        assert_eq!(form.surface().labels(), vec!["ステップ 1", "ステップ 2"]);
        assert_eq!(form.surface().step_count_field, Some(2));
    }

    #[test]
    fn test_renumber_is_single_pass() {
        let mut form = StepForm::attach(MemorySurface::with_steps(&[1, 2, 3, 4]));
        assert_eq!(form.surface().relabel_passes, 1);

        form.remove_step(2);
        form.add_step();
        assert_eq!(form.surface().relabel_passes, 3);
        assert_eq!(
            form.surface().labels(),
            vec!["ステップ 1", "ステップ 2", "ステップ 3", "ステップ 4"]
        );
    }

    #[test]
    fn test_counter_skips_server_ids() {
        let mut form = StepForm::attach(MemorySurface::with_steps(&[1, 7]));
        assert_eq!(form.counter(), 7);
        assert_eq!(form.add_step(), 8);
    }

    #[test]
    fn test_counter_defaults_to_one() {
        let mut form = StepForm::attach(MemorySurface::default());
        assert_eq!(form.counter(), 1);
        assert_eq!(form.add_step(), 2);
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate_manual_form(None, 1), Err(FormError::MissingTitle));
        assert_eq!(validate_manual_form(Some(""), 1), Err(FormError::MissingTitle));
        assert_eq!(validate_manual_form(Some(" \t\n"), 1), Err(FormError::MissingTitle));
        assert_eq!(validate_manual_form(Some("手順"), 0), Err(FormError::NoSteps));
        assert_eq!(validate_manual_form(Some("手順"), 2), Ok(()));
    }

    #[test]
    fn test_missing_title_reported_first() {
        assert_eq!(validate_manual_form(Some(" "), 0), Err(FormError::MissingTitle));
    }

    #[test]
    fn test_edit_page_without_steps() {
        let mut form = StepForm::attach(MemorySurface::default());
        assert_eq!(form.validate(Some("新しい手順書")), Err(FormError::NoSteps));

        form.add_step();
        assert_eq!(form.surface().labels(), vec!["ステップ 1"]);
        assert_eq!(form.surface().step_count_field, Some(1));
        assert_eq!(form.validate(Some("新しい手順書")), Ok(()));
    }

    #[test]
    fn test_error_text() {
        assert_eq!(FormError::MissingTitle.to_string(), "タイトルを入力してください");
        assert_eq!(
            FormError::NoSteps.to_string(),
            "少なくとも1つのステップを追加してください"
        );
    }

    #[test]
    fn test_block_markup() {
        let html = step_block_html(3);
        assert!(html.starts_with(r#"<div class="step-item" id="step-3">"#));
        assert!(html.contains(r#"data-remove-step="3""#));
        assert!(html.contains(r#"name="step_title_3" class="form-control" required"#));
        assert!(html.contains(r#"name="step_content_3""#));
        assert!(html.contains(r#"name="step_notes_3""#));
        assert!(html.contains(r#"name="step_image_3" class="form-control" accept="image/*""#));
        assert_eq!(step_element_id(3), "step-3");
    }
}
