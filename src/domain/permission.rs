//! Detailed per-page permissions.
//!
//! A [`PermissionMatrix`] maps a page key from [`PAGE_REGISTRY`] to six
//! boolean action flags. Matrices are stored as JSON on the user profile row
//! and are either edited flag by flag or overwritten with a [`RoleTemplate`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Page keys known to the application.
pub mod pages {
    pub const DASHBOARD: &str = "dashboard";
    pub const STATIONS: &str = "stations";
    pub const SALES: &str = "sales";
    pub const INVENTORY: &str = "inventory";
    pub const DELIVERIES: &str = "deliveries";
    pub const EMPLOYEES: &str = "employees";
    pub const PAYROLL: &str = "payroll";
    pub const LICENSES: &str = "licenses";
    pub const SMS: &str = "sms";
    pub const USERS: &str = "users";
    pub const PERMISSIONS: &str = "permissions";
    pub const AUDIT: &str = "audit";
}

/// Action that can be granted on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    View,
    Create,
    Edit,
    Delete,
    Export,
    Print,
}

impl PermissionAction {
    /// Every action in display order.
    pub const ALL: [PermissionAction; 6] = [
        PermissionAction::View,
        PermissionAction::Create,
        PermissionAction::Edit,
        PermissionAction::Delete,
        PermissionAction::Export,
        PermissionAction::Print,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PermissionAction::View => "view",
            PermissionAction::Create => "create",
            PermissionAction::Edit => "edit",
            PermissionAction::Delete => "delete",
            PermissionAction::Export => "export",
            PermissionAction::Print => "print",
        }
    }

    /// Parse an action key, ignoring surrounding whitespace and case.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
    }
}

/// Group used to bulk grant or revoke access to related pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageGroup {
    Operations,
    Staff,
    Compliance,
    Administration,
}

impl PageGroup {
    pub const ALL: [PageGroup; 4] = [
        PageGroup::Operations,
        PageGroup::Staff,
        PageGroup::Compliance,
        PageGroup::Administration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageGroup::Operations => "operations",
            PageGroup::Staff => "staff",
            PageGroup::Compliance => "compliance",
            PageGroup::Administration => "administration",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageGroup::Operations => "Operations",
            PageGroup::Staff => "Staff",
            PageGroup::Compliance => "Compliance",
            PageGroup::Administration => "Administration",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|group| group.as_str() == value)
    }
}

/// Static description of a page that can carry permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub group: PageGroup,
}

/// Every page that appears in a normalized permission matrix.
pub const PAGE_REGISTRY: &[PageDefinition] = &[
    PageDefinition {
        key: pages::DASHBOARD,
        label: "Dashboard",
        group: PageGroup::Operations,
    },
    PageDefinition {
        key: pages::STATIONS,
        label: "Stations",
        group: PageGroup::Operations,
    },
    PageDefinition {
        key: pages::SALES,
        label: "Sales reports",
        group: PageGroup::Operations,
    },
    PageDefinition {
        key: pages::INVENTORY,
        label: "Fuel inventory",
        group: PageGroup::Operations,
    },
    PageDefinition {
        key: pages::DELIVERIES,
        label: "Deliveries",
        group: PageGroup::Operations,
    },
    PageDefinition {
        key: pages::EMPLOYEES,
        label: "Employees",
        group: PageGroup::Staff,
    },
    PageDefinition {
        key: pages::PAYROLL,
        label: "Payroll",
        group: PageGroup::Staff,
    },
    PageDefinition {
        key: pages::LICENSES,
        label: "Licenses",
        group: PageGroup::Compliance,
    },
    PageDefinition {
        key: pages::SMS,
        label: "SMS alerts",
        group: PageGroup::Compliance,
    },
    PageDefinition {
        key: pages::USERS,
        label: "Users",
        group: PageGroup::Administration,
    },
    PageDefinition {
        key: pages::PERMISSIONS,
        label: "Permissions",
        group: PageGroup::Administration,
    },
    PageDefinition {
        key: pages::AUDIT,
        label: "Audit log",
        group: PageGroup::Administration,
    },
];

/// Look up a page definition by key.
pub fn find_page(key: &str) -> Option<&'static PageDefinition> {
    PAGE_REGISTRY.iter().find(|page| page.key == key)
}

/// Pages belonging to `group`, in registry order.
pub fn pages_in_group(group: PageGroup) -> impl Iterator<Item = &'static PageDefinition> {
    PAGE_REGISTRY.iter().filter(move |page| page.group == group)
}

/// Action flags for a single page. Missing flags deserialize as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagePermissions {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
    pub export: bool,
    pub print: bool,
}

impl PagePermissions {
    pub const NONE: PagePermissions = PagePermissions {
        view: false,
        create: false,
        edit: false,
        delete: false,
        export: false,
        print: false,
    };

    pub const ALL: PagePermissions = PagePermissions {
        view: true,
        create: true,
        edit: true,
        delete: true,
        export: true,
        print: true,
    };

    /// Flags with exactly the listed actions granted.
    pub fn from_actions(actions: &[PermissionAction]) -> Self {
        let mut permissions = Self::NONE;
        for action in actions {
            permissions.set(*action, true);
        }
        permissions
    }

    pub fn get(&self, action: PermissionAction) -> bool {
        match action {
            PermissionAction::View => self.view,
            PermissionAction::Create => self.create,
            PermissionAction::Edit => self.edit,
            PermissionAction::Delete => self.delete,
            PermissionAction::Export => self.export,
            PermissionAction::Print => self.print,
        }
    }

    pub fn set(&mut self, action: PermissionAction, value: bool) {
        let flag = match action {
            PermissionAction::View => &mut self.view,
            PermissionAction::Create => &mut self.create,
            PermissionAction::Edit => &mut self.edit,
            PermissionAction::Delete => &mut self.delete,
            PermissionAction::Export => &mut self.export,
            PermissionAction::Print => &mut self.print,
        };
        *flag = value;
    }

    /// Whether at least one action is granted.
    pub fn any(&self) -> bool {
        PermissionAction::ALL
            .into_iter()
            .any(|action| self.get(action))
    }
}

/// Map of page key to action flags, serialized as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<String, PagePermissions>);

impl PermissionMatrix {
    /// Matrix with every registry page present and nothing granted.
    pub fn empty() -> Self {
        Self(
            PAGE_REGISTRY
                .iter()
                .map(|page| (page.key.to_string(), PagePermissions::NONE))
                .collect(),
        )
    }

    /// Parse a stored JSON matrix as-is, without normalizing it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Build a normalized matrix from `page:action` grant keys.
    ///
    /// Keys naming an unknown page or action are ignored.
    pub fn from_grants<I, S>(grants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matrix = Self::empty();
        for grant in grants {
            let Some((page, action)) = grant.as_ref().split_once(':') else {
                continue;
            };
            if let Some(action) = PermissionAction::parse(action) {
                matrix.set(page.trim(), action, true);
            }
        }
        matrix
    }

    /// Copy of the matrix holding exactly the registry pages.
    pub fn normalized(&self) -> Self {
        Self(
            PAGE_REGISTRY
                .iter()
                .map(|page| (page.key.to_string(), self.page(page.key)))
                .collect(),
        )
    }

    /// Flags for `page`; unknown or missing pages grant nothing.
    pub fn page(&self, page: &str) -> PagePermissions {
        self.0.get(page).copied().unwrap_or_default()
    }

    pub fn allows(&self, page: &str, action: PermissionAction) -> bool {
        self.page(page).get(action)
    }

    /// Set a single flag. Returns `false` when `page` is not a registry page.
    pub fn set(&mut self, page: &str, action: PermissionAction, value: bool) -> bool {
        let Some(definition) = find_page(page) else {
            return false;
        };
        self.0
            .entry(definition.key.to_string())
            .or_default()
            .set(action, value);
        true
    }

    /// Replace every flag of `page`. Returns `false` for unknown pages.
    pub fn set_page(&mut self, page: &str, permissions: PagePermissions) -> bool {
        let Some(definition) = find_page(page) else {
            return false;
        };
        self.0.insert(definition.key.to_string(), permissions);
        true
    }

    /// Grant (`true`) or revoke (`false`) every action on every page of `group`.
    pub fn set_group(&mut self, group: PageGroup, value: bool) {
        let permissions = if value {
            PagePermissions::ALL
        } else {
            PagePermissions::NONE
        };
        for page in pages_in_group(group) {
            self.0.insert(page.key.to_string(), permissions);
        }
    }

    /// Grant keys (`page:action`) of every enabled flag.
    pub fn grants(&self) -> Vec<String> {
        let mut grants = Vec::new();
        for (page, permissions) in &self.0 {
            for action in PermissionAction::ALL {
                if permissions.get(action) {
                    grants.push(format!("{page}:{}", action.as_str()));
                }
            }
        }
        grants
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PagePermissions)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Preset matrices assigned through the profile role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTemplate {
    Administrator,
    Manager,
    #[default]
    Employee,
    ReadOnly,
}

impl RoleTemplate {
    pub const ALL: [RoleTemplate; 4] = [
        RoleTemplate::Administrator,
        RoleTemplate::Manager,
        RoleTemplate::Employee,
        RoleTemplate::ReadOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleTemplate::Administrator => "administrator",
            RoleTemplate::Manager => "manager",
            RoleTemplate::Employee => "employee",
            RoleTemplate::ReadOnly => "read_only",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoleTemplate::Administrator => "Administrator",
            RoleTemplate::Manager => "Manager",
            RoleTemplate::Employee => "Employee",
            RoleTemplate::ReadOnly => "Read Only",
        }
    }

    /// Parse a template by key or label (`read_only`, `read-only`, `Read Only`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .map(|ch| match ch {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL
            .into_iter()
            .find(|template| template.as_str() == normalized)
    }

    /// Full preset covering every registry page.
    pub fn matrix(self) -> PermissionMatrix {
        use PermissionAction::*;

        let mut matrix = PermissionMatrix::empty();
        for page in PAGE_REGISTRY {
            let permissions = match self {
                RoleTemplate::Administrator => PagePermissions::ALL,
                RoleTemplate::ReadOnly => PagePermissions::from_actions(&[View, Export, Print]),
                RoleTemplate::Manager => match page.group {
                    PageGroup::Operations => PagePermissions::ALL,
                    PageGroup::Administration => PagePermissions::from_actions(&[View]),
                    PageGroup::Staff | PageGroup::Compliance => {
                        PagePermissions::from_actions(&[View, Create, Edit, Export, Print])
                    }
                },
                RoleTemplate::Employee => match page.key {
                    pages::SALES | pages::INVENTORY | pages::DELIVERIES => {
                        PagePermissions::from_actions(&[View, Create])
                    }
                    pages::DASHBOARD | pages::STATIONS => PagePermissions::from_actions(&[View]),
                    _ => PagePermissions::NONE,
                },
            };
            matrix.set_page(page.key, permissions);
        }
        matrix
    }
}

impl From<&str> for RoleTemplate {
    fn from(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }
}
