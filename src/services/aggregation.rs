// src/services/aggregation.rs

use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap, HashSet},
};

use chrono::Datelike;
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use crate::{
    models::{
        academic::{Course, Student},
        branch::Branch,
        finance::{Enrollment, Payment},
        reports::{
            CourseSummary, DashboardStats, EnrollmentProgress, MonthHighlight, MonthlyIncome,
            ReportTotals, StudentDebt, YearSummary, NOT_AVAILABLE_LABEL, UNKNOWN_LABEL,
        },
    },
    services::scope::BranchResolver,
};

// Funções puras: recebem fotos imutáveis das coleções e devolvem registros prontos
// para a tela. Nada aqui faz I/O, guarda estado ou entra em pânico com dado ruim.

const MONTH_NAMES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio",
    "Julio", "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre",
];

pub fn month_name(month_number: u32) -> &'static str {
    month_number
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or(NOT_AVAILABLE_LABEL)
}

/// `part / whole * 100`, definido como 0 quando `whole` não é positivo.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Saldo pendente de uma matrícula. Um saldo negativo é erro de integridade
/// da origem: registramos e tratamos como zero.
pub fn pending_of(enrollment: &Enrollment) -> Decimal {
    let raw = enrollment.total_amount - enrollment.paid_amount;
    if raw < Decimal::ZERO {
        tracing::warn!(
            enrollment_id = enrollment.id,
            total_amount = %enrollment.total_amount,
            paid_amount = %enrollment.paid_amount,
            "⚠️ Matrícula com valor pago maior que o total, pendente ajustado para 0"
        );
        return Decimal::ZERO;
    }
    raw
}

// =============================================================================
//  1. PROGRESSO DA MATRÍCULA
// =============================================================================

pub fn compute_enrollment_progress(enrollment: &Enrollment) -> EnrollmentProgress {
    let percent = percent_of(enrollment.paid_amount, enrollment.total_amount)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0);

    EnrollmentProgress {
        enrollment_id: enrollment.id,
        total_amount: enrollment.total_amount,
        paid: enrollment.paid_amount,
        pending: pending_of(enrollment),
        percent,
    }
}

// =============================================================================
//  2. ALUNOS COM DÍVIDA
// =============================================================================

pub fn compute_student_debt(students: &[Student], enrollments: &[Enrollment]) -> Vec<StudentDebt> {
    // (dívida, quantidade de matrículas) por aluno, ativas e inativas
    let mut per_student: HashMap<i64, (Decimal, usize)> = HashMap::new();
    let mut arrival: Vec<i64> = Vec::new();

    for enrollment in enrollments {
        let entry = per_student.entry(enrollment.student_id).or_insert_with(|| {
            arrival.push(enrollment.student_id);
            (Decimal::ZERO, 0)
        });
        entry.0 += pending_of(enrollment);
        entry.1 += 1;
    }

    let mut seen: HashSet<i64> = HashSet::new();
    let mut debts: Vec<StudentDebt> = Vec::new();

    for student in students {
        if !seen.insert(student.id) {
            continue;
        }
        let Some(&(total_debt, enrollments_count)) = per_student.get(&student.id) else {
            continue;
        };
        if total_debt > Decimal::ZERO {
            debts.push(StudentDebt {
                student_id: student.id,
                student: Some(student.clone()),
                student_name: student.full_name(),
                total_debt,
                enrollments_count,
            });
        }
    }

    // Matrículas de alunos que não vieram na lista continuam contando
    for student_id in arrival.into_iter().filter(|id| !seen.contains(id)) {
        let Some(&(total_debt, enrollments_count)) = per_student.get(&student_id) else {
            continue;
        };
        tracing::warn!(student_id, "⚠️ Matrícula referencia um aluno inexistente");
        if total_debt > Decimal::ZERO {
            debts.push(StudentDebt {
                student_id,
                student: None,
                student_name: UNKNOWN_LABEL.to_string(),
                total_debt,
                enrollments_count,
            });
        }
    }

    // sort_by é estável: empates mantêm a ordem de chegada
    debts.sort_by(|a, b| b.total_debt.cmp(&a.total_debt));
    debts
}

// =============================================================================
//  3. RESUMO POR CURSO
// =============================================================================

#[derive(Default, Clone, Copy)]
struct CourseTally {
    enrollments: usize,
    billed: Decimal,
    revenue: Decimal,
    pending: Decimal,
}

pub fn compute_course_summary(courses: &[Course], enrollments: &[Enrollment]) -> Vec<CourseSummary> {
    let mut per_course: HashMap<i64, CourseTally> = HashMap::new();
    let mut arrival: Vec<i64> = Vec::new();

    for enrollment in enrollments {
        let tally = per_course.entry(enrollment.course_id).or_insert_with(|| {
            arrival.push(enrollment.course_id);
            CourseTally::default()
        });
        tally.enrollments += 1;
        tally.billed += enrollment.total_amount;
        tally.revenue += enrollment.paid_amount;
        tally.pending += pending_of(enrollment);
    }

    let summarize = |course_id: i64, course: Option<&Course>, tally: CourseTally| CourseSummary {
        course_id,
        course: course.cloned(),
        course_name: course.map_or_else(|| UNKNOWN_LABEL.to_string(), |c| c.name.clone()),
        total_enrollments: tally.enrollments,
        total_billed: tally.billed,
        total_revenue: tally.revenue,
        total_pending: tally.pending,
        collection_rate: percent_of(tally.revenue, tally.billed),
    };

    let mut seen: HashSet<i64> = HashSet::new();
    let mut summaries: Vec<CourseSummary> = courses
        .iter()
        .filter(|course| seen.insert(course.id))
        .filter_map(|course| {
            per_course
                .get(&course.id)
                .map(|tally| summarize(course.id, Some(course), *tally))
        })
        .collect();

    for course_id in arrival.into_iter().filter(|id| !seen.contains(id)) {
        let Some(tally) = per_course.get(&course_id) else {
            continue;
        };
        tracing::warn!(course_id, "⚠️ Matrícula referencia um curso inexistente");
        summaries.push(summarize(course_id, None, *tally));
    }

    summaries.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    summaries
}

// =============================================================================
//  4. PAINEL
// =============================================================================

pub fn compute_dashboard_stats(
    students: &[Student],
    courses: &[Course],
    enrollments: &[Enrollment],
    payments: &[Payment],
) -> DashboardStats {
    let confirmed = payments.iter().filter(|p| p.is_confirmed());

    let (total_payments, total_revenue) = confirmed
        .fold((0usize, Decimal::ZERO), |(count, sum), p| (count + 1, sum + p.amount));

    // Saldo vem das matrículas, não dos pagamentos: são dois livros-razão distintos
    let total_billed: Decimal = enrollments.iter().map(|e| e.total_amount).sum();
    let total_paid: Decimal = enrollments.iter().map(|e| e.paid_amount).sum();

    DashboardStats {
        total_students: students.iter().filter(|s| s.active).count(),
        total_courses: courses.iter().filter(|c| c.active).count(),
        total_enrollments: enrollments.len(),
        total_payments,
        total_revenue,
        pending_amount: total_billed - total_paid,
    }
}

/// Pagamentos mais recentes primeiro.
pub fn recent_payments(payments: &[Payment], limit: usize) -> Vec<Payment> {
    let mut latest: Vec<Payment> = payments.to_vec();
    latest.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
    latest.truncate(limit);
    latest
}

pub fn enrollments_with_pending(enrollments: &[Enrollment], limit: usize) -> Vec<Enrollment> {
    enrollments
        .iter()
        .filter(|e| e.total_amount > e.paid_amount)
        .take(limit)
        .cloned()
        .collect()
}

// =============================================================================
//  5. TOTAIS DA TELA DE RELATÓRIOS
// =============================================================================

pub fn compute_report_totals(enrollments: &[Enrollment], debts: &[StudentDebt]) -> ReportTotals {
    let total_revenue: Decimal = enrollments.iter().map(|e| e.paid_amount).sum();
    let total_billed: Decimal = enrollments.iter().map(|e| e.total_amount).sum();

    ReportTotals {
        total_students_with_debt: debts.len(),
        total_debt: debts.iter().map(|d| d.total_debt).sum(),
        total_revenue,
        total_billed,
        collection_rate: percent_of(total_revenue, total_billed),
    }
}

// =============================================================================
//  6. RELATÓRIO MENSAL
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MonthlyIncomeFilter {
    pub year: i32,
    pub branch_id: Option<i64>,
}

#[derive(Default)]
struct MonthBucket {
    sales: Decimal,
    paid: Decimal,
    payments: usize,
}

/// Uma linha por (mês, sede). Sem filtro, cada sede vira uma linha própria;
/// registros sem sede resolvida ficam numa linha com `branchId` nulo.
pub fn compute_monthly_income(
    payments: &[Payment],
    enrollments: &[Enrollment],
    students: &[Student],
    branches: &[Branch],
    filter: &MonthlyIncomeFilter,
) -> Vec<MonthlyIncome> {
    let resolver = BranchResolver::new(students, enrollments);
    let in_branch = |branch: Option<i64>| match filter.branch_id {
        Some(wanted) => branch == Some(wanted),
        None => true,
    };

    // Mês mais recente primeiro; dentro do mês, por sede
    let mut buckets: BTreeMap<(Reverse<u32>, Option<i64>), MonthBucket> = BTreeMap::new();

    // Vendas: o valor da matrícula entra no mês em que ela foi feita
    for enrollment in enrollments {
        let branch = resolver.of_enrollment(enrollment);
        if enrollment.enrollment_date.year() != filter.year || !in_branch(branch) {
            continue;
        }
        buckets
            .entry((Reverse(enrollment.enrollment_date.month()), branch))
            .or_default()
            .sales += enrollment.total_amount;
    }

    // Recebido: apenas pagamentos CONFIRMADO, no mês do pagamento
    for payment in payments.iter().filter(|p| p.is_confirmed()) {
        let branch = resolver.of_payment(payment);
        if payment.payment_date.year() != filter.year || !in_branch(branch) {
            continue;
        }
        let bucket = buckets
            .entry((Reverse(payment.payment_date.month()), branch))
            .or_default();
        bucket.paid += payment.amount;
        bucket.payments += 1;
    }

    let names: HashMap<i64, &str> = branches.iter().map(|b| (b.id, b.name.as_str())).collect();

    buckets
        .into_iter()
        .map(|((Reverse(month_number), branch_id), bucket)| MonthlyIncome {
            month: month_name(month_number).to_string(),
            year: filter.year,
            month_number,
            total_sales: bucket.sales,
            total_paid: bucket.paid,
            total_pending: bucket.sales - bucket.paid,
            payment_count: bucket.payments,
            branch_id,
            branch_name: branch_id.map(|id| {
                names
                    .get(&id)
                    .copied()
                    .unwrap_or(NOT_AVAILABLE_LABEL)
                    .to_string()
            }),
        })
        .collect()
}

/// Resumo do ano. As linhas de sedes diferentes no mesmo mês somam num só mês.
pub fn compute_year_summary(rows: &[MonthlyIncome]) -> Option<YearSummary> {
    // (rótulo, recebido) por mês, na ordem em que os meses aparecem
    let mut months: Vec<(u32, String, Decimal)> = Vec::new();
    for row in rows {
        match months.iter_mut().find(|(number, _, _)| *number == row.month_number) {
            Some((_, _, paid)) => *paid += row.total_paid,
            None => months.push((
                row.month_number,
                format!("{} {}", row.month, row.year),
                row.total_paid,
            )),
        }
    }
    let first = months.first()?;

    let total_paid: Decimal = months.iter().map(|(_, _, paid)| *paid).sum();
    let total_payments: usize = rows.iter().map(|r| r.payment_count).sum();
    let average_monthly = total_paid
        .checked_div(Decimal::from(months.len()))
        .unwrap_or(Decimal::ZERO);

    // Empates: o melhor é o primeiro encontrado, o pior é o último
    let mut best = first;
    let mut worst = first;
    for month in &months {
        if month.2 > best.2 {
            best = month;
        }
        if month.2 <= worst.2 {
            worst = month;
        }
    }

    let highlight = |(_, label, amount): &(u32, String, Decimal)| MonthHighlight {
        month: label.clone(),
        amount: *amount,
    };

    Some(YearSummary {
        total_paid,
        total_payments,
        average_monthly,
        best_month: highlight(best),
        worst_month: highlight(worst),
    })
}
