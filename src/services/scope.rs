// src/services/scope.rs

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    academic::Student,
    auth::{Claims, Role},
    finance::{Enrollment, Payment},
    snapshot::Snapshot,
};

// ---
// AccessScope (O "Recorte" do usuário)
// ---
// Resolvido uma vez por requisição a partir do token e da sede selecionada.
// É só conveniência de exibição: quem autoriza de verdade é a API de origem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessScope {
    pub role: Role,
    pub branch_id: Option<i64>,
    pub student_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    All,
    Branch(i64),
    Student(i64),
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub can_see_branch_column: bool,
    pub can_select_branch: bool,
    pub can_manage_branches: bool,
}

impl AccessScope {
    pub fn resolve(claims: &Claims, selected_branch: Option<i64>) -> Self {
        match claims.role {
            // SUPER_ADMIN: visão global ou a sede que escolheu
            Role::SuperAdmin => Self {
                role: Role::SuperAdmin,
                branch_id: selected_branch,
                student_id: None,
            },
            // ADMIN: sempre a própria sede, a seleção é ignorada
            Role::Admin => {
                if selected_branch.is_some() && selected_branch != claims.branch_id {
                    tracing::debug!(
                        user = %claims.sub,
                        ?selected_branch,
                        "ADMIN tentou selecionar outra sede; usando a sede atribuída"
                    );
                }
                Self {
                    role: Role::Admin,
                    branch_id: claims.branch_id,
                    student_id: None,
                }
            }
            Role::Student => Self {
                role: Role::Student,
                branch_id: claims.branch_id,
                student_id: claims.student_id,
            },
        }
    }

    pub fn visibility(&self) -> Visibility {
        match (self.role, self.branch_id, self.student_id) {
            (Role::SuperAdmin, None, _) => Visibility::All,
            (Role::SuperAdmin, Some(id), _) | (Role::Admin, Some(id), _) => Visibility::Branch(id),
            // ADMIN sem sede atribuída não vê nada
            (Role::Admin, None, _) => Visibility::Nothing,
            (Role::Student, _, Some(id)) => Visibility::Student(id),
            (Role::Student, _, None) => Visibility::Nothing,
        }
    }

    /// Valor do `branchId` enviado à API de origem.
    pub fn upstream_branch_filter(&self) -> Option<i64> {
        match self.visibility() {
            Visibility::Branch(id) => Some(id),
            _ => None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        let super_admin = self.role == Role::SuperAdmin;
        Capabilities {
            can_see_branch_column: super_admin,
            can_select_branch: super_admin,
            can_manage_branches: super_admin,
        }
    }
}

// ---
// BranchResolver
// ---
// A sede de uma matrícula é a dela própria ou, na falta, a do aluno.
// A de um pagamento é a dele própria ou a da matrícula.
pub struct BranchResolver {
    student_branch: HashMap<i64, Option<i64>>,
    enrollment_branch: HashMap<i64, Option<i64>>,
}

impl BranchResolver {
    pub fn new(students: &[Student], enrollments: &[Enrollment]) -> Self {
        let student_branch: HashMap<i64, Option<i64>> =
            students.iter().map(|s| (s.id, s.branch_id)).collect();

        let enrollment_branch = enrollments
            .iter()
            .map(|e| {
                let branch = e
                    .branch_id
                    .or_else(|| student_branch.get(&e.student_id).copied().flatten());
                (e.id, branch)
            })
            .collect();

        Self { student_branch, enrollment_branch }
    }

    pub fn of_student(&self, student_id: i64) -> Option<i64> {
        self.student_branch.get(&student_id).copied().flatten()
    }

    pub fn of_enrollment(&self, enrollment: &Enrollment) -> Option<i64> {
        enrollment.branch_id.or_else(|| self.of_student(enrollment.student_id))
    }

    pub fn of_payment(&self, payment: &Payment) -> Option<i64> {
        payment.branch_id.or_else(|| {
            self.enrollment_branch
                .get(&payment.enrollment_id)
                .copied()
                .flatten()
        })
    }
}

/// Recorta a foto para o escopo do usuário antes de qualquer agregação.
pub fn restrict(snapshot: Snapshot, scope: &AccessScope) -> Snapshot {
    let visibility = scope.visibility();
    let Snapshot {
        mut branches,
        mut students,
        courses,
        mut enrollments,
        mut payments,
    } = snapshot;

    match visibility {
        Visibility::All => {}
        Visibility::Nothing => {
            tracing::info!(role = ?scope.role, "Usuário sem sede ou aluno associado, relatório vazio");
            return Snapshot::default();
        }
        Visibility::Branch(branch_id) => {
            // O resolvedor enxerga as coleções completas, antes do recorte
            let resolver = BranchResolver::new(&students, &enrollments);
            students.retain(|s| s.branch_id == Some(branch_id));
            enrollments.retain(|e| resolver.of_enrollment(e) == Some(branch_id));
            payments.retain(|p| resolver.of_payment(p) == Some(branch_id));
            branches.retain(|b| b.id == branch_id);
        }
        Visibility::Student(student_id) => {
            students.retain(|s| s.id == student_id);
            enrollments.retain(|e| e.student_id == student_id);
            let own: HashSet<i64> = enrollments.iter().map(|e| e.id).collect();
            payments.retain(|p| own.contains(&p.enrollment_id));
            branches.retain(|b| scope.branch_id == Some(b.id));
        }
    }

    Snapshot {
        branches,
        students,
        courses,
        enrollments,
        payments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        academic::Course,
        branch::Branch,
        finance::{PaymentStatus, PaymentType},
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn claims(role: Role, branch_id: Option<i64>, student_id: Option<i64>) -> Claims {
        Claims {
            sub: "usuario".to_string(),
            role,
            branch_id,
            student_id,
            exp: 0,
            iat: 0,
        }
    }

    fn branch(id: i64) -> Branch {
        Branch {
            id,
            code: format!("S{id}"),
            name: format!("Sede {id}"),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            is_main: id == 1,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn student(id: i64, branch_id: Option<i64>) -> Student {
        Student {
            id,
            first_name: format!("Aluno{id}"),
            last_name: "Test".to_string(),
            document_number: format!("{id}"),
            email: String::new(),
            phone: String::new(),
            active: true,
            branch_id,
        }
    }

    fn enrollment(id: i64, student_id: i64, branch_id: Option<i64>) -> Enrollment {
        Enrollment {
            id,
            student_id,
            course_id: 1,
            branch_id,
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            total_amount: Decimal::from(100),
            paid_amount: Decimal::ZERO,
            active: true,
        }
    }

    fn payment(id: i64, enrollment_id: i64, branch_id: Option<i64>) -> Payment {
        Payment {
            id,
            enrollment_id,
            branch_id,
            amount: Decimal::from(10),
            payment_date: NaiveDate::from_ymd_opt(2024, 1, 11)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            payment_type: PaymentType::Abono,
            status: PaymentStatus::Confirmado,
            payment_method_id: None,
            payment_method_name: "Efectivo".to_string(),
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            branches: vec![branch(1), branch(2)],
            students: vec![student(1, Some(1)), student(2, Some(2)), student(3, None)],
            courses: vec![Course {
                id: 1,
                name: "Carro B1".to_string(),
                description: String::new(),
                price: Decimal::from(100),
                total_hours: 20,
                active: true,
            }],
            enrollments: vec![
                enrollment(10, 1, None),    // sede 1 via aluno
                enrollment(11, 2, None),    // sede 2 via aluno
                enrollment(12, 3, Some(1)), // sede 1 própria
            ],
            payments: vec![
                payment(100, 10, None),
                payment(101, 11, None),
                payment(102, 12, None),
                payment(103, 11, Some(1)), // pagamento registrado na sede 1
            ],
        }
    }

    #[test]
    fn super_admin_without_selection_sees_everything() {
        let scope = AccessScope::resolve(&claims(Role::SuperAdmin, None, None), None);

        assert_eq!(scope.visibility(), Visibility::All);
        assert_eq!(scope.upstream_branch_filter(), None);
        assert!(scope.capabilities().can_see_branch_column);

        let restricted = restrict(snapshot(), &scope);
        assert_eq!(restricted.payments.len(), 4);
    }

    #[test]
    fn super_admin_selection_and_admin_restrict_to_branch() {
        let selected = AccessScope::resolve(&claims(Role::SuperAdmin, None, None), Some(1));
        let admin = AccessScope::resolve(&claims(Role::Admin, Some(1), None), Some(2));

        assert_eq!(selected.visibility(), Visibility::Branch(1));
        assert_eq!(admin.visibility(), Visibility::Branch(1));
        assert!(!admin.capabilities().can_select_branch);

        let restricted = restrict(snapshot(), &admin);
        assert_eq!(restricted.students.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(restricted.enrollments.iter().map(|e| e.id).collect::<Vec<_>>(), vec![10, 12]);
        assert_eq!(restricted.payments.iter().map(|p| p.id).collect::<Vec<_>>(), vec![100, 102, 103]);
        assert_eq!(restricted.branches.len(), 1);
        assert_eq!(restricted.courses.len(), 1);
    }

    #[test]
    fn admin_without_branch_sees_nothing() {
        let scope = AccessScope::resolve(&claims(Role::Admin, None, None), Some(1));

        assert_eq!(scope.visibility(), Visibility::Nothing);
        let restricted = restrict(snapshot(), &scope);
        assert!(restricted.students.is_empty());
        assert!(restricted.payments.is_empty());
        assert!(restricted.courses.is_empty());
    }

    #[test]
    fn student_sees_only_own_records() {
        let scope = AccessScope::resolve(&claims(Role::Student, Some(2), Some(2)), None);

        let restricted = restrict(snapshot(), &scope);

        assert_eq!(restricted.students.len(), 1);
        assert_eq!(restricted.enrollments.iter().map(|e| e.id).collect::<Vec<_>>(), vec![11]);
        assert_eq!(restricted.payments.iter().map(|p| p.id).collect::<Vec<_>>(), vec![101, 103]);
        assert_eq!(restricted.branches.iter().map(|b| b.id).collect::<Vec<_>>(), vec![2]);
        assert!(!scope.capabilities().can_manage_branches);
    }

    #[test]
    fn branch_resolver_prefers_own_branch() {
        let data = snapshot();
        let resolver = BranchResolver::new(&data.students, &data.enrollments);

        assert_eq!(resolver.of_enrollment(&data.enrollments[0]), Some(1));
        assert_eq!(resolver.of_enrollment(&data.enrollments[2]), Some(1));
        assert_eq!(resolver.of_payment(&data.payments[1]), Some(2));
        assert_eq!(resolver.of_payment(&data.payments[3]), Some(1));
        assert_eq!(resolver.of_payment(&payment(999, 404, None)), None);
    }
}
