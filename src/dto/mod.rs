pub mod directions_dto;
pub mod solver_dto;
