use super::expression::MemoryExpression;

/// Conjunction of expressions. Short-circuits; an empty conjunction is true.
pub struct AndLogic;

impl AndLogic {
    pub fn build(children: Vec<MemoryExpression>) -> MemoryExpression {
        MemoryExpression::new(move |record| children.iter().all(|child| child.evaluate(record)))
    }
}

/// Disjunction of expressions. Short-circuits; an empty disjunction is false.
pub struct OrLogic;

impl OrLogic {
    pub fn build(children: Vec<MemoryExpression>) -> MemoryExpression {
        MemoryExpression::new(move |record| children.iter().any(|child| child.evaluate(record)))
    }
}
