//! In-memory scene
//!
//! A host-independent [`EntitySpawner`] and [`NavigationBaker`] used by the
//! command line tool and by tests.

use hashbrown::{HashMap, HashSet};

use crate::spawn::{EntityHandle, EntitySpawner, NavigationBaker, SpawnError, TemplateId, Transform};

/// An entity recorded by the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntity {
    pub template: TemplateId,
    pub transform: Transform,
    pub parent: Option<EntityHandle>,
}

/// Records spawned entities and their parent links
#[derive(Debug, Default)]
pub struct SceneRecorder {
    entities: HashMap<EntityHandle, SceneEntity>,
    next_id: u64,
    /// When set, spawning any other template fails
    known_templates: Option<HashSet<TemplateId>>,
    total_spawned: u64,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene that only knows the given templates
    pub fn with_templates<I>(templates: I) -> Self
    where
        I: IntoIterator<Item = TemplateId>,
    {
        Self {
            known_templates: Some(templates.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Number of entities currently alive
    pub fn live_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of entities ever spawned
    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&SceneEntity> {
        self.entities.get(&handle)
    }

    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.entities.contains_key(&handle)
    }

    /// Live entities spawned from `template`
    pub fn count_template(&self, template: &str) -> usize {
        self.entities
            .values()
            .filter(|e| e.template.as_str() == template)
            .count()
    }

    /// Direct children of `parent`
    pub fn children(&self, parent: EntityHandle) -> Vec<EntityHandle> {
        let mut children: Vec<_> = self
            .entities
            .iter()
            .filter(|(_, e)| e.parent == Some(parent))
            .map(|(&h, _)| h)
            .collect();
        children.sort();
        children
    }
}

impl EntitySpawner for SceneRecorder {
    fn spawn(
        &mut self,
        template: &TemplateId,
        transform: Transform,
        parent: Option<EntityHandle>,
    ) -> Result<EntityHandle, SpawnError> {
        if let Some(known) = &self.known_templates
            && !known.contains(template)
        {
            return Err(SpawnError::UnknownTemplate(template.clone()));
        }
        if let Some(p) = parent
            && !self.entities.contains_key(&p)
        {
            return Err(SpawnError::MissingParent(p));
        }

        let handle = EntityHandle(self.next_id);
        self.next_id += 1;
        self.total_spawned += 1;
        self.entities.insert(
            handle,
            SceneEntity {
                template: template.clone(),
                transform,
                parent,
            },
        );
        Ok(handle)
    }

    fn despawn(&mut self, handle: EntityHandle) {
        let mut pending = vec![handle];
        while let Some(current) = pending.pop() {
            if self.entities.remove(&current).is_none() {
                continue;
            }
            pending.extend(
                self.entities
                    .iter()
                    .filter(|(_, e)| e.parent == Some(current))
                    .map(|(&h, _)| h),
            );
        }
    }
}

/// Records navigation bake requests
#[derive(Debug, Default)]
pub struct BakeRecorder {
    pub requests: Vec<EntityHandle>,
}

impl NavigationBaker for BakeRecorder {
    fn request_bake(&mut self, scope: EntityHandle) {
        self.requests.push(scope);
    }
}
